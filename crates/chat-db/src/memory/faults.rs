//! Fault injection around [`MemoryStore`]
//!
//! Adds per-call latency and switchable failures so ordering and error
//! paths of the coordination core can be exercised deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use chat_core::entities::{ChatStats, Message, NewMessage, NewRoom, Room, RoomActivity};
use chat_core::error::DomainError;
use chat_core::traits::{
    MessageRepository, RepoResult, RoomRepository, SessionRepository, StatsRepository,
};
use chat_core::value_objects::ConnectionId;

use super::MemoryStore;

/// Wrapper that delays or fails calls before delegating to a [`MemoryStore`]
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    save_delays: Mutex<VecDeque<Duration>>,
    room_create_delay: Mutex<Option<Duration>>,
    session_save_delay: Mutex<Option<Duration>>,
    fail_saves: AtomicBool,
    fail_room_creates: AtomicBool,
    fail_reads: AtomicBool,
    fail_sessions: AtomicBool,
}

impl FaultyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// The wrapped store
    pub fn inner(&self) -> &Arc<MemoryStore> {
        &self.inner
    }

    /// Delay the next message saves, one entry per call, in order
    pub fn delay_saves(&self, delays: impl IntoIterator<Item = Duration>) {
        self.save_delays.lock().extend(delays);
    }

    /// Delay every room creation
    pub fn delay_room_creates(&self, delay: Duration) {
        *self.room_create_delay.lock() = Some(delay);
    }

    /// Delay every session upsert
    pub fn delay_session_saves(&self, delay: Duration) {
        *self.session_save_delay.lock() = Some(delay);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_room_creates(&self, fail: bool) {
        self.fail_room_creates.store(fail, Ordering::SeqCst);
    }

    /// Fail history, search, listing and stats reads
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, what: &str) -> RepoResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError(format!("injected {what} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for FaultyStore {
    async fn save(&self, message: &NewMessage) -> RepoResult<Message> {
        let delay = self.save_delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail_saves, "save")?;
        MessageRepository::save(self.inner.as_ref(), message).await
    }

    async fn find_recent(&self, room: &str, limit: i64) -> RepoResult<Vec<Message>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.find_recent(room, limit).await
    }

    async fn search(&self, room: &str, query: &str, limit: i64) -> RepoResult<Vec<Message>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.search(room, query, limit).await
    }

    async fn activity(&self) -> RepoResult<Vec<RoomActivity>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.activity().await
    }
}

#[async_trait]
impl RoomRepository for FaultyStore {
    async fn create(&self, room: &NewRoom) -> RepoResult<Room> {
        let delay = *self.room_create_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail_room_creates, "room create")?;
        self.inner.create(room).await
    }

    async fn find_all(&self) -> RepoResult<Vec<Room>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.find_all().await
    }
}

#[async_trait]
impl SessionRepository for FaultyStore {
    async fn save(&self, id: &ConnectionId, username: &str, room: &str) -> RepoResult<()> {
        let delay = *self.session_save_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Self::check(&self.fail_sessions, "session")?;
        SessionRepository::save(self.inner.as_ref(), id, username, room).await
    }

    async fn remove(&self, id: &ConnectionId) -> RepoResult<()> {
        Self::check(&self.fail_sessions, "session")?;
        self.inner.remove(id).await
    }

    async fn remove_idle(&self, max_idle: chrono::Duration) -> RepoResult<u64> {
        Self::check(&self.fail_sessions, "session")?;
        self.inner.remove_idle(max_idle).await
    }
}

#[async_trait]
impl StatsRepository for FaultyStore {
    async fn summary(&self) -> RepoResult<ChatStats> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.summary().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::entities::Session;

    #[tokio::test]
    async fn test_injected_save_failure_persists_nothing() {
        let store = FaultyStore::new(Arc::new(MemoryStore::new()));
        store.fail_saves(true);

        let session = Session::new(ConnectionId::from("c1"), "alice", "general").unwrap();
        let draft = NewMessage::from_session(&session, "hello").unwrap();
        let err = MessageRepository::save(&store, &draft).await.unwrap_err();

        assert!(err.is_infrastructure());
        assert!(store.inner().messages_in("general").is_empty());
    }

    #[tokio::test]
    async fn test_save_delays_are_consumed_in_order() {
        let store = FaultyStore::new(Arc::new(MemoryStore::new()));
        store.delay_saves([Duration::from_millis(50)]);

        let session = Session::new(ConnectionId::from("c1"), "alice", "general").unwrap();
        let draft = NewMessage::from_session(&session, "hello").unwrap();

        let started = std::time::Instant::now();
        MessageRepository::save(&store, &draft).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));

        let started = std::time::Instant::now();
        MessageRepository::save(&store, &draft).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}

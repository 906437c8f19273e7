//! In-memory implementation of every repository trait
//!
//! Used when no database is configured and as the backing store in tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use chat_core::entities::{ChatStats, Message, NewMessage, NewRoom, Room, RoomActivity};
use chat_core::error::DomainError;
use chat_core::traits::{
    MessageRepository, RepoResult, RoomRepository, SessionRepository, StatsRepository,
};
use chat_core::value_objects::ConnectionId;

#[derive(Debug, Clone)]
struct SessionRow {
    username: String,
    room: String,
    last_activity: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    next_message_id: i64,
    messages: Vec<Message>,
    rooms: BTreeMap<String, Room>,
    sessions: HashMap<ConnectionId, SessionRow>,
}

/// Process-local store; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Inspection hooks for test suites
#[cfg(any(test, feature = "testing"))]
impl MemoryStore {
    /// Number of durable session rows
    pub fn session_count(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    /// Whether a durable session row exists for `id`
    pub fn has_session(&self, id: &ConnectionId) -> bool {
        self.inner.lock().sessions.contains_key(id)
    }

    /// Room recorded for `id`'s durable session row
    pub fn session_room(&self, id: &ConnectionId) -> Option<String> {
        self.inner.lock().sessions.get(id).map(|row| row.room.clone())
    }

    /// Every persisted message of `room`, in commit order
    pub fn messages_in(&self, room: &str) -> Vec<Message> {
        self.inner
            .lock()
            .messages
            .iter()
            .filter(|m| m.room == room)
            .cloned()
            .collect()
    }

    /// Backdate a session row, for exercising idle cleanup
    pub fn touch_session(&self, id: &ConnectionId, last_activity: DateTime<Utc>) {
        if let Some(row) = self.inner.lock().sessions.get_mut(id) {
            row.last_activity = last_activity;
        }
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn save(&self, message: &NewMessage) -> RepoResult<Message> {
        let mut inner = self.inner.lock();
        inner.next_message_id += 1;

        // Timestamps never go backwards within the store
        let now = Utc::now();
        let created_at = inner
            .messages
            .last()
            .map_or(now, |last| last.created_at.max(now));

        let saved = message.clone().persisted(inner.next_message_id, created_at);
        inner.messages.push(saved.clone());
        Ok(saved)
    }

    async fn find_recent(&self, room: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let inner = self.inner.lock();

        let mut recent: Vec<Message> = inner
            .messages
            .iter()
            .rev()
            .filter(|m| m.room == room)
            .take(limit)
            .cloned()
            .collect();
        recent.reverse();
        Ok(recent)
    }

    async fn search(&self, room: &str, query: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let needle = query.to_lowercase();
        let inner = self.inner.lock();

        Ok(inner
            .messages
            .iter()
            .rev()
            .filter(|m| m.room == room && m.text.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn activity(&self) -> RepoResult<Vec<RoomActivity>> {
        let inner = self.inner.lock();
        let mut by_room: BTreeMap<&str, RoomActivity> = BTreeMap::new();

        for message in &inner.messages {
            let entry = by_room
                .entry(message.room.as_str())
                .or_insert_with(|| RoomActivity {
                    room: message.room.clone(),
                    message_count: 0,
                    last_activity: None,
                });
            entry.message_count += 1;
            entry.last_activity = entry.last_activity.max(Some(message.created_at));
        }

        Ok(by_room.into_values().collect())
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn create(&self, room: &NewRoom) -> RepoResult<Room> {
        let mut inner = self.inner.lock();
        if inner.rooms.contains_key(&room.name) {
            return Err(DomainError::DuplicateRoom(room.name.clone()));
        }

        let created = room.clone().into_room(Utc::now());
        inner.rooms.insert(created.name.clone(), created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> RepoResult<Vec<Room>> {
        Ok(self.inner.lock().rooms.values().cloned().collect())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn save(&self, id: &ConnectionId, username: &str, room: &str) -> RepoResult<()> {
        self.inner.lock().sessions.insert(
            id.clone(),
            SessionRow {
                username: username.to_string(),
                room: room.to_string(),
                last_activity: Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, id: &ConnectionId) -> RepoResult<()> {
        self.inner.lock().sessions.remove(id);
        Ok(())
    }

    async fn remove_idle(&self, max_idle: Duration) -> RepoResult<u64> {
        let cutoff = Utc::now() - max_idle;
        let mut inner = self.inner.lock();
        let before = inner.sessions.len();
        inner.sessions.retain(|_, row| row.last_activity >= cutoff);
        Ok((before - inner.sessions.len()) as u64)
    }
}

#[async_trait]
impl StatsRepository for MemoryStore {
    async fn summary(&self) -> RepoResult<ChatStats> {
        let now = Utc::now();
        let day_ago = now - Duration::hours(24);
        let five_minutes_ago = now - Duration::minutes(5);
        let inner = self.inner.lock();

        let recent_users: std::collections::HashSet<&str> = inner
            .sessions
            .values()
            .filter(|row| row.last_activity > day_ago)
            .map(|row| row.username.as_str())
            .collect();

        Ok(ChatStats {
            total_messages: inner.messages.len() as i64,
            total_users: recent_users.len() as i64,
            total_rooms: inner.rooms.len() as i64,
            active_users: inner
                .sessions
                .values()
                .filter(|row| row.last_activity > five_minutes_ago)
                .count() as i64,
            messages_last_24h: inner
                .messages
                .iter()
                .filter(|m| m.created_at > day_ago)
                .count() as i64,
        })
    }
}

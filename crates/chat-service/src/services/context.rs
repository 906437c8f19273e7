//! Service context - dependency container for services
//!
//! Holds the persistence collaborators the coordination core talks to.

use std::sync::Arc;

use chat_core::traits::{MessageRepository, RoomRepository, SessionRepository, StatsRepository};
use chat_db::{
    MemoryStore, PgMessageRepository, PgPool, PgRoomRepository, PgSessionRepository,
    PgStatsRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every repository sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    message_repo: Arc<dyn MessageRepository>,
    room_repo: Arc<dyn RoomRepository>,
    session_repo: Arc<dyn SessionRepository>,
    stats_repo: Arc<dyn StatsRepository>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        room_repo: Arc<dyn RoomRepository>,
        session_repo: Arc<dyn SessionRepository>,
        stats_repo: Arc<dyn StatsRepository>,
    ) -> Self {
        Self {
            message_repo,
            room_repo,
            session_repo,
            stats_repo,
        }
    }

    /// Context backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgMessageRepository::new(pool.clone())),
            Arc::new(PgRoomRepository::new(pool.clone())),
            Arc::new(PgSessionRepository::new(pool.clone())),
            Arc::new(PgStatsRepository::new(pool)),
        )
    }

    /// Context backed by a single in-memory store
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    // === Repositories ===

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the room repository
    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    /// Get the session repository
    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.session_repo.as_ref()
    }

    /// Get the stats repository
    pub fn stats_repo(&self) -> &dyn StatsRepository {
        self.stats_repo.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    message_repo: Option<Arc<dyn MessageRepository>>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    session_repo: Option<Arc<dyn SessionRepository>>,
    stats_repo: Option<Arc<dyn StatsRepository>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one store for every repository
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: MessageRepository + RoomRepository + SessionRepository + StatsRepository + 'static,
    {
        self.message_repo(store.clone())
            .room_repo(store.clone())
            .session_repo(store.clone())
            .stats_repo(store)
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn session_repo(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn stats_repo(mut self, repo: Arc<dyn StatsRepository>) -> Self {
        self.stats_repo = Some(repo);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            self.session_repo
                .ok_or_else(|| ServiceError::validation("session_repo is required"))?,
            self.stats_repo
                .ok_or_else(|| ServiceError::validation("stats_repo is required"))?,
        ))
    }
}

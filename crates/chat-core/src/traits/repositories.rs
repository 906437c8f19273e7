//! Repository traits (ports) - the persistence collaborator contract
//!
//! The coordination core only ever talks to storage through these traits.
//! `chat-db` provides a PostgreSQL and an in-memory implementation.

use async_trait::async_trait;
use chrono::Duration;

use crate::entities::{ChatStats, Message, NewMessage, NewRoom, Room, RoomActivity};
use crate::error::DomainError;
use crate::value_objects::ConnectionId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message, returning it with its store-assigned id and timestamp
    async fn save(&self, message: &NewMessage) -> RepoResult<Message>;

    /// Most recent `limit` messages of `room`, oldest first
    async fn find_recent(&self, room: &str, limit: i64) -> RepoResult<Vec<Message>>;

    /// Case-insensitive substring search within `room`, newest first
    async fn search(&self, room: &str, query: &str, limit: i64) -> RepoResult<Vec<Message>>;

    /// Message count and last activity for every room with messages
    async fn activity(&self) -> RepoResult<Vec<RoomActivity>>;
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create a room; fails with `DuplicateRoom` when the name is taken
    async fn create(&self, room: &NewRoom) -> RepoResult<Room>;

    /// All rooms in the store
    async fn find_all(&self) -> RepoResult<Vec<Room>>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Upsert the durable record of a live session
    async fn save(&self, id: &ConnectionId, username: &str, room: &str) -> RepoResult<()>;

    /// Remove the record; no-op if absent
    async fn remove(&self, id: &ConnectionId) -> RepoResult<()>;

    /// Delete records idle for longer than `max_idle`, returning how many went
    async fn remove_idle(&self, max_idle: Duration) -> RepoResult<u64>;
}

// ============================================================================
// Stats Repository
// ============================================================================

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Aggregate counters over the whole store
    async fn summary(&self) -> RepoResult<ChatStats>;
}

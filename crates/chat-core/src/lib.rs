//! # chat-core
//!
//! Domain layer containing entities, value objects, error types and the
//! persistence traits the coordination core depends on.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChatStats, Message, MessageKind, NewMessage, NewRoom, Room, RoomActivity, RoomSummary,
    Session, DEFAULT_ROOM, DEFAULT_ROOMS, MAX_MESSAGE_LEN, SYSTEM_USER,
};
pub use error::DomainError;
pub use traits::{
    MessageRepository, RepoResult, RoomRepository, SessionRepository, StatsRepository,
};
pub use value_objects::ConnectionId;

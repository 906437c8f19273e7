//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::ConnectionId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message too long: max {max} characters")]
    MessageTooLong { max: usize },

    #[error("Invalid room name: {0}")]
    InvalidRoomName(String),

    #[error("Invalid display name: {0}")]
    InvalidDisplayName(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Room already exists: {0}")]
    DuplicateRoom(String),

    #[error("Connection already joined: {0}")]
    AlreadyRegistered(ConnectionId),

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No session for connection: {0}")]
    SessionNotFound(ConnectionId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            Self::InvalidRoomName(_) => "INVALID_ROOM_NAME",
            Self::InvalidDisplayName(_) => "INVALID_DISPLAY_NAME",
            Self::DuplicateRoom(_) => "DUPLICATE_ROOM",
            Self::AlreadyRegistered(_) => "ALREADY_JOINED",
            Self::SessionNotFound(_) => "NOT_JOINED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyMessage
                | Self::MessageTooLong { .. }
                | Self::InvalidRoomName(_)
                | Self::InvalidDisplayName(_)
                | Self::AlreadyRegistered(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateRoom(_))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }

    /// Check if this error came from the persistence layer or below
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }
}

//! Application error types
//!
//! Server-level failures and the client-facing error kinds.

use chat_core::DomainError;
use serde::Serialize;
use std::fmt;

/// Category of failure reported to clients in `error` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    DuplicateRoom,
    Persistence,
    NotJoined,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::DuplicateRoom => "duplicate-room",
            Self::Persistence => "persistence",
            Self::NotJoined => "not-joined",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorKind {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::DuplicateRoom(_) => Self::DuplicateRoom,
            DomainError::SessionNotFound(_) => Self::NotJoined,
            DomainError::DatabaseError(_) => Self::Persistence,
            DomainError::InternalError(_) => Self::Internal,
            e if e.is_validation() => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Errors that stop the server from starting or serving
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

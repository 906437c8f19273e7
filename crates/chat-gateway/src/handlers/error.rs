//! Handler error types

use chat_common::ErrorKind;
use chat_core::DomainError;
use chat_service::ServiceError;
use thiserror::Error;

use crate::protocol::{DecodeError, ServerEvent};

/// Handler error type
///
/// Reported to the originating connection only; never fatal for the socket.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded or failed validation
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Service or domain error
    #[error("{0}")]
    Service(#[from] ServiceError),
}

impl HandlerError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPayload(_) => ErrorKind::Validation,
            Self::Service(e) => e.kind(),
        }
    }

    /// Message safe to show to the client
    pub fn client_message(&self) -> String {
        match self {
            Self::Service(e) => e.client_message(),
            Self::InvalidPayload(_) => self.to_string(),
        }
    }

    /// The `error` event for this failure
    pub fn to_event(&self) -> ServerEvent {
        ServerEvent::error(self.client_message(), self.kind())
    }
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        Self::Service(ServiceError::from(err))
    }
}

impl From<DecodeError> for HandlerError {
    fn from(err: DecodeError) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Result type for handlers
pub type HandlerResult<T> = Result<T, HandlerError>;

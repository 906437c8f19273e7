//! Message service
//!
//! Validation, persistence and queries for chat messages. Ordering of
//! concurrent writes is the caller's concern; see the gateway pipeline.

use chat_core::entities::{Message, NewMessage, Session};
use tracing::{debug, error, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Upper bound for any history or search page
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate raw text and bind it to the session's current room
    ///
    /// Nothing is stored; a rejected draft never reaches the repository.
    pub fn prepare(&self, session: &Session, raw_text: &str) -> ServiceResult<NewMessage> {
        Ok(NewMessage::from_session(session, raw_text)?)
    }

    /// Durably store a prepared message
    #[instrument(skip(self, draft), fields(room = %draft.room, author = %draft.username))]
    pub async fn persist(&self, draft: &NewMessage) -> ServiceResult<Message> {
        match self.ctx.message_repo().save(draft).await {
            Ok(message) => {
                debug!(message_id = message.id, "Message persisted");
                Ok(message)
            }
            Err(e) => {
                error!(error = %e, "Failed to persist message");
                Err(e.into())
            }
        }
    }

    /// Most recent `limit` messages of `room`, oldest first
    #[instrument(skip(self))]
    pub async fn history(&self, room: &str, limit: i64) -> ServiceResult<Vec<Message>> {
        let limit = clamp_limit(limit)?;
        Ok(self.ctx.message_repo().find_recent(room, limit).await?)
    }

    /// Case-insensitive search within `room`, newest first
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        room: &str,
        query: &str,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<Message>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::validation("search query must not be empty"));
        }

        let limit = clamp_limit(limit.unwrap_or(DEFAULT_SEARCH_LIMIT))?;
        Ok(self.ctx.message_repo().search(room, query, limit).await?)
    }
}

fn clamp_limit(limit: i64) -> ServiceResult<i64> {
    if limit < 1 {
        return Err(ServiceError::validation("limit must be positive"));
    }
    Ok(limit.min(MAX_PAGE_SIZE))
}

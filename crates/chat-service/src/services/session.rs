//! Session service
//!
//! Durable bookkeeping of live sessions. The authoritative session state is
//! in memory in the gateway; these rows feed stats and idle cleanup.

use chat_core::entities::Session;
use chat_core::value_objects::ConnectionId;
use chrono::Duration;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Upsert the row for `session` with its current room
    #[instrument(skip(self, session), fields(connection_id = %session.connection_id, room = %session.current_room))]
    pub async fn save(&self, session: &Session) -> ServiceResult<()> {
        self.ctx
            .session_repo()
            .save(
                &session.connection_id,
                &session.display_name,
                &session.current_room,
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to save session");
                e.into()
            })
    }

    /// Delete the row for `id`; absent rows are fine
    #[instrument(skip(self), fields(connection_id = %id))]
    pub async fn remove(&self, id: &ConnectionId) -> ServiceResult<()> {
        self.ctx.session_repo().remove(id).await.map_err(|e| {
            warn!(error = %e, "Failed to remove session");
            e.into()
        })
    }

    /// Delete rows idle longer than `ttl`
    #[instrument(skip(self))]
    pub async fn cleanup_idle(&self, ttl: Duration) -> ServiceResult<u64> {
        let removed = self.ctx.session_repo().remove_idle(ttl).await?;
        if removed > 0 {
            info!(removed, "Removed idle sessions");
        }
        Ok(removed)
    }
}

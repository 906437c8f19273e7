//! Stats service

use tracing::instrument;

use crate::dto::StatsResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Stats service
pub struct StatsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatsService<'a> {
    /// Create a new StatsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store-wide counters plus the number of live connections
    #[instrument(skip(self))]
    pub async fn summary(&self, connected_users: usize) -> ServiceResult<StatsResponse> {
        let stats = self.ctx.stats_repo().summary().await?;
        Ok(StatsResponse::new(stats, connected_users))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chat_db::{FaultyStore, MemoryStore};

    use super::*;
    use crate::services::ServiceContextBuilder;

    #[tokio::test]
    async fn test_summary_includes_connected_users() {
        let ctx = ServiceContext::in_memory(Arc::new(MemoryStore::new()));
        let stats = StatsService::new(&ctx).summary(4).await.unwrap();
        assert_eq!(stats.connected_users, 4);
        assert_eq!(stats.stats.total_messages, 0);
    }

    #[tokio::test]
    async fn test_summary_failure_propagates() {
        let faulty = Arc::new(FaultyStore::new(Arc::new(MemoryStore::new())));
        faulty.fail_reads(true);
        let ctx = ServiceContextBuilder::new().store(faulty).build().unwrap();

        let err = StatsService::new(&ctx).summary(0).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}

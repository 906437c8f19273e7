//! PostgreSQL implementation of StatsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::ChatStats;
use chat_core::traits::{RepoResult, StatsRepository};

use super::error::map_db_error;

/// PostgreSQL implementation of StatsRepository
#[derive(Clone)]
pub struct PgStatsRepository {
    pool: PgPool,
}

impl PgStatsRepository {
    /// Create a new PgStatsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    #[instrument(skip(self))]
    async fn summary(&self) -> RepoResult<ChatStats> {
        Ok(ChatStats {
            total_messages: self.count("SELECT COUNT(*) FROM messages").await?,
            total_users: self
                .count(
                    "SELECT COUNT(DISTINCT username) FROM user_sessions \
                     WHERE last_activity > NOW() - INTERVAL '24 hours'",
                )
                .await?,
            total_rooms: self.count("SELECT COUNT(*) FROM rooms").await?,
            active_users: self
                .count(
                    "SELECT COUNT(*) FROM user_sessions \
                     WHERE last_activity > NOW() - INTERVAL '5 minutes'",
                )
                .await?,
            messages_last_24h: self
                .count(
                    "SELECT COUNT(*) FROM messages \
                     WHERE created_at > NOW() - INTERVAL '24 hours'",
                )
                .await?,
        })
    }
}

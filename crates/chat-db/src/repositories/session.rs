//! PostgreSQL implementation of SessionRepository

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;

use chat_core::traits::{RepoResult, SessionRepository};
use chat_core::value_objects::ConnectionId;

use super::error::map_db_error;

/// PostgreSQL implementation of SessionRepository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self), fields(connection_id = %id))]
    async fn save(&self, id: &ConnectionId, username: &str, room: &str) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (socket_id, username, room)
            VALUES ($1, $2, $3)
            ON CONFLICT (socket_id)
            DO UPDATE SET
                username = EXCLUDED.username,
                room = EXCLUDED.room,
                last_activity = NOW()
            "#,
        )
        .bind(id.as_str())
        .bind(username)
        .bind(room)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(connection_id = %id))]
    async fn remove(&self, id: &ConnectionId) -> RepoResult<()> {
        sqlx::query("DELETE FROM user_sessions WHERE socket_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_idle(&self, max_idle: Duration) -> RepoResult<u64> {
        let cutoff = Utc::now() - max_idle;

        let result = sqlx::query("DELETE FROM user_sessions WHERE last_activity < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

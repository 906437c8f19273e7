//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::{Message, NewMessage, RoomActivity};
use chat_core::traits::{MessageRepository, RepoResult};

use crate::mappers::like_pattern;
use crate::models::{InsertedMessageModel, MessageModel, RoomActivityModel};

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(room = %message.room))]
    async fn save(&self, message: &NewMessage) -> RepoResult<Message> {
        let inserted = sqlx::query_as::<_, InsertedMessageModel>(
            r#"
            INSERT INTO messages (text, username, room, avatar, message_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(&message.text)
        .bind(&message.username)
        .bind(&message.room)
        .bind(&message.avatar)
        .bind(message.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(message
            .clone()
            .persisted(inserted.id, inserted.created_at))
    }

    #[instrument(skip(self))]
    async fn find_recent(&self, room: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let mut rows = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, text, username, room, avatar, created_at, message_type
            FROM messages
            WHERE room = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(room)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.reverse();
        Ok(rows.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, room: &str, query: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, text, username, room, avatar, created_at, message_type
            FROM messages
            WHERE room = $1 AND text ILIKE $2
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(room)
        .bind(like_pattern(query))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn activity(&self) -> RepoResult<Vec<RoomActivity>> {
        let rows = sqlx::query_as::<_, RoomActivityModel>(
            r#"
            SELECT room, COUNT(*) AS message_count, MAX(created_at) AS last_activity
            FROM messages
            GROUP BY room
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(RoomActivity::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageRepository>();
    }
}

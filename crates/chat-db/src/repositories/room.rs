//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::{NewRoom, Room};
use chat_core::error::DomainError;
use chat_core::traits::{RepoResult, RoomRepository};

use crate::models::RoomModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self, room), fields(room = %room.name))]
    async fn create(&self, room: &NewRoom) -> RepoResult<Room> {
        let row = sqlx::query_as::<_, RoomModel>(
            r#"
            INSERT INTO rooms (name, description, created_by, is_private, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING name, description, created_by, created_at, is_private, password_hash
            "#,
        )
        .bind(&room.name)
        .bind(&room.description)
        .bind(&room.created_by)
        .bind(room.is_private)
        .bind(&room.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateRoom(room.name.clone())))?;

        Ok(Room::from(row))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT name, description, created_by, created_at, is_private, password_hash
            FROM rooms
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }
}

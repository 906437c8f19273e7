//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub text: String,
    pub username: String,
    pub room: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub message_type: String,
}

/// Per-room aggregate over the messages table
#[derive(Debug, Clone, FromRow)]
pub struct RoomActivityModel {
    pub room: String,
    pub message_count: i64,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Identity assigned by the database on insert
#[derive(Debug, Clone, Copy, FromRow)]
pub struct InsertedMessageModel {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

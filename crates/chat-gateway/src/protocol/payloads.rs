//! Event payload definitions
//!
//! Client payloads are validated at the boundary before reaching the core;
//! server payloads are plain serializable views.

use chat_common::ErrorKind;
use chat_core::entities::{Message, RoomSummary, Session};
use chat_core::{ConnectionId, Room};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Client Payloads
// ============================================================================

/// Payload of `join`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    /// Requested display name; a fallback is generated when blank
    #[serde(default)]
    #[validate(length(max = 50, message = "username must be at most 50 characters"))]
    pub username: Option<String>,

    /// Room to enter; `general` when absent
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "room must be 1-50 characters"))]
    pub room: Option<String>,
}

/// Payload of `send-message`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub text: String,
}

/// Payload of `join-room`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinRoomPayload {
    #[validate(length(min = 1, max = 50, message = "room must be 1-50 characters"))]
    pub room: String,
}

/// Payload of `create-room`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub password_hash: Option<String>,
}

// ============================================================================
// Server Payloads
// ============================================================================

/// Public view of a session, as shown in rosters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: ConnectionId,
    pub username: String,
    pub room: String,
    pub avatar: String,
    pub joined_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.connection_id.clone(),
            username: session.display_name.clone(),
            room: session.current_room.clone(),
            avatar: session.avatar.clone(),
            joined_at: session.joined_at,
        }
    }
}

/// Member list of one room
#[derive(Debug, Clone, Serialize)]
pub struct RosterPayload {
    pub room: String,
    pub users: Vec<SessionView>,
}

/// Recent messages of one room, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPayload {
    pub room: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomChangedPayload {
    pub room: String,
}

/// Announcement of a new room to every connection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedPayload {
    pub name: String,
    pub description: String,
    pub created_by: String,
}

impl From<&Room> for RoomCreatedPayload {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            description: room.description.clone(),
            created_by: room.created_by.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomListPayload {
    pub rooms: Vec<RoomSummary>,
}

/// Presence notice (connected, left, joined room, disconnected)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresencePayload {
    pub username: String,
    pub room: String,
    pub timestamp: DateTime<Utc>,
}

impl PresencePayload {
    pub fn new(username: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            room: room.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub username: String,
    pub is_typing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub message: String,
    pub kind: ErrorKind,
}

//! Room entity - a named channel participants can join

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;

/// Room every participant lands in when no room is requested
pub const DEFAULT_ROOM: &str = "general";

/// Author recorded for rooms seeded at startup
pub const SYSTEM_USER: &str = "system";

/// Rooms seeded into an empty directory: (name, description)
pub const DEFAULT_ROOMS: [(&str, &str); 3] = [
    ("general", "General discussion"),
    ("random", "Random conversations"),
    ("tech", "Technology discussions"),
];

/// Maximum room name length in characters
pub const MAX_ROOM_NAME_LEN: usize = 50;

/// Room entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub is_private: bool,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

/// Data needed to create a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub is_private: bool,
    pub password_hash: Option<String>,
}

impl NewRoom {
    /// Build a room request, normalizing the name
    pub fn new(
        name: &str,
        description: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: normalize_room_name(name)?,
            description: description.into(),
            created_by: created_by.into(),
            is_private: false,
            password_hash: None,
        })
    }

    pub fn private(mut self, password_hash: Option<String>) -> Self {
        self.is_private = true;
        self.password_hash = password_hash;
        self
    }

    /// Materialize the room with the given creation time
    pub fn into_room(self, created_at: DateTime<Utc>) -> Room {
        Room {
            name: self.name,
            description: self.description,
            created_by: self.created_by,
            created_at,
            is_private: self.is_private,
            password_hash: self.password_hash,
        }
    }
}

/// Message activity derived from the message store for one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomActivity {
    pub room: String,
    pub message_count: i64,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Directory listing entry: room metadata merged with activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    #[serde(flatten)]
    pub room: Room,
    pub message_count: i64,
    pub last_activity: Option<DateTime<Utc>>,
}

impl RoomSummary {
    /// Merge rooms with their activity.
    ///
    /// Ordered by most recent activity first; rooms without messages come
    /// last, alphabetically.
    pub fn merge(rooms: Vec<Room>, activity: &[RoomActivity]) -> Vec<Self> {
        let mut summaries: Vec<Self> = rooms
            .into_iter()
            .map(|room| {
                let found = activity.iter().find(|a| a.room == room.name);
                Self {
                    message_count: found.map_or(0, |a| a.message_count),
                    last_activity: found.and_then(|a| a.last_activity),
                    room,
                }
            })
            .collect();

        summaries.sort_by(|a, b| match (a.last_activity, b.last_activity) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.room.name.cmp(&b.room.name)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.room.name.cmp(&b.room.name),
        });

        summaries
    }
}

/// Trim and validate a room name
pub fn normalize_room_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(DomainError::InvalidRoomName("must not be empty".to_string()));
    }
    if name.chars().count() > MAX_ROOM_NAME_LEN {
        return Err(DomainError::InvalidRoomName(format!(
            "must be at most {MAX_ROOM_NAME_LEN} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(DomainError::InvalidRoomName(
            "must not contain control characters".to_string(),
        ));
    }

    Ok(name.to_string())
}

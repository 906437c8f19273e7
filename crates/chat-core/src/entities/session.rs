//! Session entity - the identity bound to one live connection

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::DomainError;
use crate::value_objects::ConnectionId;

/// Maximum display name length in characters
pub const MAX_DISPLAY_NAME_LEN: usize = 50;

/// Avatar used when no display name character is available
pub const DEFAULT_AVATAR: &str = "👤";

/// Session entity
///
/// Exactly one per joined connection. `current_room` always mirrors the
/// room membership index; only a room switch changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub display_name: String,
    pub current_room: String,
    pub avatar: String,
    pub joined_at: DateTime<Utc>,
}

impl Session {
    /// Create a new Session
    ///
    /// A blank `requested_name` is replaced with a generated fallback name.
    pub fn new(
        connection_id: ConnectionId,
        requested_name: &str,
        room: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let display_name = normalize_display_name(requested_name)?;
        let avatar = avatar_glyph(&display_name);

        Ok(Self {
            connection_id,
            display_name,
            current_room: room.into(),
            avatar,
            joined_at: Utc::now(),
        })
    }

    /// Check whether the session currently sits in `room`
    #[inline]
    pub fn is_in(&self, room: &str) -> bool {
        self.current_room == room
    }
}

/// Trim a requested display name, falling back to a generated one when blank
pub fn normalize_display_name(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(fallback_display_name());
    }

    if trimmed.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(DomainError::InvalidDisplayName(format!(
            "must be at most {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }

    Ok(trimmed.to_string())
}

/// Generate a name for anonymous participants
pub fn fallback_display_name() -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..10_000);
    format!("User{suffix}")
}

/// Upper-cased first character of the name
pub fn avatar_glyph(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| DEFAULT_AVATAR.to_string())
}

//! Message entity - represents a persisted chat message

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Session;
use crate::error::DomainError;

/// Maximum message length in characters, counted after trimming
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    System,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
        }
    }

    /// Parse the stored representation; unknown values read as `User`
    pub fn parse(s: &str) -> Self {
        match s {
            "system" => Self::System,
            _ => Self::User,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message entity
///
/// Immutable once persisted. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub username: String,
    pub room: String,
    pub avatar: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "messageType")]
    pub kind: MessageKind,
}

/// A validated message that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub text: String,
    pub username: String,
    pub room: String,
    pub avatar: String,
    pub kind: MessageKind,
}

impl NewMessage {
    /// Validate `raw` and bind it to the session's current room.
    ///
    /// The room is read here, once; later switches do not move the message.
    pub fn from_session(session: &Session, raw: &str) -> Result<Self, DomainError> {
        Ok(Self {
            text: validate_text(raw)?,
            username: session.display_name.clone(),
            room: session.current_room.clone(),
            avatar: session.avatar.clone(),
            kind: MessageKind::User,
        })
    }

    /// A message authored by the server itself
    pub fn system(room: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            username: crate::entities::SYSTEM_USER.to_string(),
            room: room.into(),
            avatar: crate::entities::DEFAULT_AVATAR.to_string(),
            kind: MessageKind::System,
        }
    }

    /// Attach the identity assigned by the store
    pub fn persisted(self, id: i64, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            text: self.text,
            username: self.username,
            room: self.room,
            avatar: self.avatar,
            created_at,
            kind: self.kind,
        }
    }
}

/// Trim message text and enforce the length bounds
pub fn validate_text(raw: &str) -> Result<String, DomainError> {
    let text = raw.trim();

    if text.is_empty() {
        return Err(DomainError::EmptyMessage);
    }
    if text.chars().count() > MAX_MESSAGE_LEN {
        return Err(DomainError::MessageTooLong {
            max: MAX_MESSAGE_LEN,
        });
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ConnectionId;

    fn session() -> Session {
        Session::new(ConnectionId::from("c1"), "alice", "general").unwrap()
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert!(matches!(validate_text(""), Err(DomainError::EmptyMessage)));
        assert!(matches!(
            validate_text(" \n\t "),
            Err(DomainError::EmptyMessage)
        ));
    }

    #[test]
    fn test_length_boundary() {
        assert!(validate_text(&"a".repeat(MAX_MESSAGE_LEN)).is_ok());
        assert!(matches!(
            validate_text(&"a".repeat(MAX_MESSAGE_LEN + 1)),
            Err(DomainError::MessageTooLong { max: 1000 })
        ));
    }

    #[test]
    fn test_length_counts_characters_after_trim() {
        let padded = format!("  {}  ", "é".repeat(MAX_MESSAGE_LEN));
        assert_eq!(validate_text(&padded).unwrap().chars().count(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_from_session_captures_room() {
        let mut session = session();
        let draft = NewMessage::from_session(&session, " hi ").unwrap();
        session.current_room = "tech".to_string();

        assert_eq!(draft.text, "hi");
        assert_eq!(draft.room, "general");
        assert_eq!(draft.username, "alice");
        assert_eq!(draft.kind, MessageKind::User);
    }

    #[test]
    fn test_message_serialization() {
        let message = NewMessage::from_session(&session(), "hello")
            .unwrap()
            .persisted(7, Utc::now());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["messageType"], "user");
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(MessageKind::parse("system"), MessageKind::System);
        assert_eq!(MessageKind::parse("user"), MessageKind::User);
        assert_eq!(MessageKind::parse("other"), MessageKind::User);
    }
}

//! Gateway event format
//!
//! Every frame is a JSON text message `{"event": "<name>", "data": {...}}`.

use chat_common::ErrorKind;
use chat_core::{Message, Room, Session};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::payloads::{
    CreateRoomPayload, ErrorPayload, HistoryPayload, JoinPayload, JoinRoomPayload,
    PresencePayload, RoomChangedPayload, RoomCreatedPayload, RoomListPayload, RosterPayload,
    SendMessagePayload, SessionView, TypingPayload,
};

/// Event sent by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(alias = "join-chat")]
    Join(JoinPayload),
    SendMessage(SendMessagePayload),
    JoinRoom(JoinRoomPayload),
    CreateRoom(CreateRoomPayload),
    ListRooms,
    TypingStart,
    TypingStop,
}

/// Reasons a client frame is rejected before dispatch
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl ClientEvent {
    /// Decode and validate a text frame
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let event: Self = serde_json::from_str(text)?;
        event.validate()?;
        Ok(event)
    }

    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Self::Join(p) => p.validate(),
            Self::JoinRoom(p) => p.validate(),
            Self::CreateRoom(p) => p.validate(),
            Self::SendMessage(_) | Self::ListRooms | Self::TypingStart | Self::TypingStop => Ok(()),
        }
    }

    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::SendMessage(_) => "send-message",
            Self::JoinRoom(_) => "join-room",
            Self::CreateRoom(_) => "create-room",
            Self::ListRooms => "list-rooms",
            Self::TypingStart => "typing-start",
            Self::TypingStop => "typing-stop",
        }
    }
}

/// Event sent by the server
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// The joining connection's own session
    UserJoined(SessionView),
    RoomUsers(RosterPayload),
    MessageHistory(HistoryPayload),
    NewMessage(Message),
    RoomChanged(RoomChangedPayload),
    RoomCreated(RoomCreatedPayload),
    RoomCreateSuccess(Room),
    RoomList(RoomListPayload),
    UserConnected(PresencePayload),
    UserDisconnected(PresencePayload),
    UserJoinedRoom(PresencePayload),
    UserLeft(PresencePayload),
    UserTyping(TypingPayload),
    Error(ErrorPayload),
}

impl ServerEvent {
    pub fn user_joined(session: &Session) -> Self {
        Self::UserJoined(SessionView::from(session))
    }

    pub fn roster(room: impl Into<String>, users: Vec<SessionView>) -> Self {
        Self::RoomUsers(RosterPayload {
            room: room.into(),
            users,
        })
    }

    pub fn history(room: impl Into<String>, messages: Vec<Message>) -> Self {
        Self::MessageHistory(HistoryPayload {
            room: room.into(),
            messages,
        })
    }

    pub fn room_changed(room: impl Into<String>) -> Self {
        Self::RoomChanged(RoomChangedPayload { room: room.into() })
    }

    pub fn typing(username: impl Into<String>, is_typing: bool) -> Self {
        Self::UserTyping(TypingPayload {
            username: username.into(),
            is_typing,
        })
    }

    pub fn error(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
            kind,
        })
    }

    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserJoined(_) => "user-joined",
            Self::RoomUsers(_) => "room-users",
            Self::MessageHistory(_) => "message-history",
            Self::NewMessage(_) => "new-message",
            Self::RoomChanged(_) => "room-changed",
            Self::RoomCreated(_) => "room-created",
            Self::RoomCreateSuccess(_) => "room-create-success",
            Self::RoomList(_) => "room-list",
            Self::UserConnected(_) => "user-connected",
            Self::UserDisconnected(_) => "user-disconnected",
            Self::UserJoinedRoom(_) => "user-joined-room",
            Self::UserLeft(_) => "user-left",
            Self::UserTyping(_) => "user-typing",
            Self::Error(_) => "error",
        }
    }

    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

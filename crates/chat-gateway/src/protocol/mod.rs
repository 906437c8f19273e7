//! Gateway protocol definitions
//!
//! Defines the WebSocket event schema and payloads.

mod events;
mod payloads;

pub use events::{ClientEvent, DecodeError, ServerEvent};
pub use payloads::{
    CreateRoomPayload, ErrorPayload, HistoryPayload, JoinPayload, JoinRoomPayload,
    PresencePayload, RoomChangedPayload, RoomCreatedPayload, RoomListPayload, RosterPayload,
    SendMessagePayload, SessionView, TypingPayload,
};

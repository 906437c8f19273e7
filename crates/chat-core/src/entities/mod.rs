//! Domain entities - core business objects

mod message;
mod room;
mod session;
mod stats;

pub use message::{validate_text, Message, MessageKind, NewMessage, MAX_MESSAGE_LEN};
pub use room::{
    normalize_room_name, NewRoom, Room, RoomActivity, RoomSummary, DEFAULT_ROOM, DEFAULT_ROOMS,
    MAX_ROOM_NAME_LEN, SYSTEM_USER,
};
pub use session::{
    avatar_glyph, fallback_display_name, normalize_display_name, Session, DEFAULT_AVATAR,
    MAX_DISPLAY_NAME_LEN,
};
pub use stats::ChatStats;

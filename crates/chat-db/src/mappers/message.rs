//! Message entity <-> model mapper

use chat_core::entities::{Message, MessageKind, RoomActivity, DEFAULT_AVATAR};

use crate::models::{MessageModel, RoomActivityModel};

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: model.id,
            text: model.text,
            username: model.username,
            room: model.room,
            avatar: model
                .avatar
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            created_at: model.created_at,
            kind: MessageKind::parse(&model.message_type),
        }
    }
}

impl From<RoomActivityModel> for RoomActivity {
    fn from(model: RoomActivityModel) -> Self {
        RoomActivity {
            room: model.room,
            message_count: model.message_count,
            last_activity: model.last_activity,
        }
    }
}

/// Escape LIKE wildcards so a search term matches literally
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

//! Room entity <-> model mapper

use chat_core::entities::{Room, SYSTEM_USER};

use crate::models::RoomModel;

/// Convert RoomModel to Room entity
impl From<RoomModel> for Room {
    fn from(model: RoomModel) -> Self {
        Room {
            name: model.name,
            description: model.description.unwrap_or_default(),
            created_by: model.created_by.unwrap_or_else(|| SYSTEM_USER.to_string()),
            created_at: model.created_at,
            is_private: model.is_private,
            password_hash: model.password_hash,
        }
    }
}

//! Database models - SQLx-compatible structs for PostgreSQL tables

mod message;
mod room;

pub use message::{InsertedMessageModel, MessageModel, RoomActivityModel};
pub use room::RoomModel;

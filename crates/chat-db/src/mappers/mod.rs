//! Entity to model mappers
//!
//! `From<Model> for Entity` conversions for rows read back from PostgreSQL.

mod message;
mod room;

pub use message::like_pattern;

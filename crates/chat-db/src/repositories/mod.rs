//! Repository implementations

mod error;
mod message;
mod room;
mod session;
mod stats;

pub use error::{map_db_error, map_unique_violation};
pub use message::PgMessageRepository;
pub use room::PgRoomRepository;
pub use session::PgSessionRepository;
pub use stats::PgStatsRepository;

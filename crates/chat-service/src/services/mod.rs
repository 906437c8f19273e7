//! Business logic services
//!
//! Stateless services borrow a [`ServiceContext`]; the [`RoomDirectory`]
//! owns process-wide state and is shared behind an `Arc`.

pub mod context;
pub mod error;
pub mod message;
pub mod room;
pub mod session;
pub mod stats;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use message::{MessageService, DEFAULT_SEARCH_LIMIT, MAX_PAGE_SIZE};
pub use room::RoomDirectory;
pub use session::SessionService;
pub use stats::StatsService;

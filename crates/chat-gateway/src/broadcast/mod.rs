//! Room-scoped fanout
//!
//! Rosters and presence notices, the persist-then-fanout message pipeline,
//! and typing notices.

mod pipeline;
mod presence;
mod typing;

pub use pipeline::MessagePipeline;
pub use presence::PresenceBroadcaster;
pub use typing::TypingRelay;

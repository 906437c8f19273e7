//! Connection tracking
//!
//! Sockets, their sessions, and which room each one occupies.

mod connection;
mod membership;
mod registry;

pub use connection::Connection;
pub use membership::{MembershipTable, RoomMembershipIndex, Transition};
pub use registry::ConnectionRegistry;

//! Value objects - immutable types that represent domain concepts

mod connection_id;

pub use connection_id::ConnectionId;

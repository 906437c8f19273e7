//! In-memory storage backend

#[cfg(any(test, feature = "testing"))]
mod faults;
mod store;

#[cfg(any(test, feature = "testing"))]
pub use faults::FaultyStore;
pub use store::MemoryStore;

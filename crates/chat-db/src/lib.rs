//! # chat-db
//!
//! Storage layer implementing the chat-core repository traits.
//!
//! ## Overview
//!
//! - PostgreSQL via SQLx: pool management, schema bootstrap, `FromRow`
//!   models, model to entity mappers and one repository per trait
//! - [`MemoryStore`]: a process-local implementation of every trait, used
//!   when no database is configured
//! - `FaultyStore` (feature `testing`): latency and failure injection around
//!   a `MemoryStore`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_db::{create_pool, ensure_schema, DatabaseConfig, PgMessageRepository};
//!
//! async fn example() -> Result<(), sqlx::Error> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/chat", 20, 1)).await?;
//!     ensure_schema(&pool).await?;
//!     let messages = PgMessageRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
#[cfg(any(test, feature = "testing"))]
pub use memory::FaultyStore;
pub use memory::MemoryStore;
pub use pool::{create_pool, ensure_schema, DatabaseConfig, PgPool};
pub use repositories::{
    PgMessageRepository, PgRoomRepository, PgSessionRepository, PgStatsRepository,
};

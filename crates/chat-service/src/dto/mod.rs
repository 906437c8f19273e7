//! Data transfer objects for the HTTP surface
//!
//! - Request DTOs with validation for query inputs
//! - Response DTOs for serializing outputs

pub mod requests;
pub mod responses;

pub use requests::MessageQueryParams;
pub use responses::{HealthResponse, MessageListResponse, StatsResponse};

//! Request DTOs for HTTP endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

/// Query string of the room messages endpoint
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MessageQueryParams {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,

    /// Search term; history is returned when absent
    #[validate(length(min = 1, max = 100, message = "q must be 1-100 characters"))]
    pub q: Option<String>,
}

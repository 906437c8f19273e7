//! HTTP surface
//!
//! Health, stats and read-only room endpoints served next to the gateway.

mod extract;
mod handlers;
mod middleware;
mod response;

pub use middleware::{apply_middleware, REQUEST_ID_HEADER};
pub use response::{ApiError, ApiResult, ErrorBody, ErrorDetail};

use axum::{routing::get, Router};

use crate::server::GatewayState;

/// Health route, kept outside the rate limiter
pub fn health_routes() -> Router<GatewayState> {
    Router::new().route("/health", get(handlers::health_check))
}

/// REST routes under `/api`
pub fn api_routes() -> Router<GatewayState> {
    Router::new().nest(
        "/api",
        Router::new()
            .route("/stats", get(handlers::get_stats))
            .route("/rooms", get(handlers::list_rooms))
            .route("/rooms/:room/messages", get(handlers::get_room_messages)),
    )
}

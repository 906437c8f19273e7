//! HTTP handlers
//!
//! Read-only views over the store and the live gateway state.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_core::entities::normalize_room_name;
use chat_core::RoomSummary;
use chat_service::dto::{HealthResponse, MessageListResponse, MessageQueryParams, StatsResponse};
use chat_service::{MessageService, StatsService};

use super::extract::ValidatedQuery;
use super::response::ApiResult;
use crate::server::GatewayState;

/// Liveness probe
///
/// GET /health
pub async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        state.uptime_seconds(),
        state.config().app.env.as_str(),
    ))
}

/// Aggregate counters plus the number of joined connections
///
/// GET /api/stats
pub async fn get_stats(State(state): State<GatewayState>) -> ApiResult<Json<StatsResponse>> {
    let connected = state.registry().session_count();
    let stats = StatsService::new(state.service_context())
        .summary(connected)
        .await?;
    Ok(Json(stats))
}

/// Room directory with activity
///
/// GET /api/rooms
pub async fn list_rooms(State(state): State<GatewayState>) -> ApiResult<Json<Vec<RoomSummary>>> {
    Ok(Json(state.directory().list().await?))
}

/// Recent history of a room, or search results when `q` is given
///
/// GET /api/rooms/{room}/messages
pub async fn get_room_messages(
    State(state): State<GatewayState>,
    Path(room): Path<String>,
    ValidatedQuery(params): ValidatedQuery<MessageQueryParams>,
) -> ApiResult<Json<MessageListResponse>> {
    let room = normalize_room_name(&room)?;
    let service = MessageService::new(state.service_context());

    let messages = match params.q.as_deref() {
        Some(query) => service.search(&room, query, params.limit).await?,
        None => {
            let limit = params
                .limit
                .unwrap_or(state.config().gateway.history_limit);
            service.history(&room, limit).await?
        }
    };

    Ok(Json(MessageListResponse { room, messages }))
}

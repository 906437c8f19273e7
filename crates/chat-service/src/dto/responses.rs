//! Response DTOs for HTTP endpoints
//!
//! All response DTOs implement `Serialize`; field names are camelCase.

use chat_core::entities::{ChatStats, Message};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Message Responses
// ============================================================================

/// A page of messages from one room
#[derive(Debug, Clone, Serialize)]
pub struct MessageListResponse {
    pub room: String,
    pub messages: Vec<Message>,
}

// ============================================================================
// Stats Responses
// ============================================================================

/// Aggregate counters plus live connection count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ChatStats,
    pub connected_users: usize,
    pub timestamp: DateTime<Utc>,
}

impl StatsResponse {
    pub fn new(stats: ChatStats, connected_users: usize) -> Self {
        Self {
            stats,
            connected_users,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub env: String,
}

impl HealthResponse {
    pub fn healthy(uptime_seconds: u64, env: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            uptime_seconds,
            env: env.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy(12, "development");
        assert_eq!(health.status, "healthy");

        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["uptimeSeconds"], 12);
        assert_eq!(json["env"], "development");
    }

    #[test]
    fn test_stats_response_is_flat() {
        let stats = ChatStats {
            total_messages: 10,
            total_users: 2,
            total_rooms: 3,
            active_users: 1,
            messages_last_24h: 5,
        };
        let json = serde_json::to_value(StatsResponse::new(stats, 7)).unwrap();
        assert_eq!(json["totalMessages"], 10);
        assert_eq!(json["messagesLast24h"], 5);
        assert_eq!(json["connectedUsers"], 7);
        assert!(json.get("stats").is_none());
    }
}

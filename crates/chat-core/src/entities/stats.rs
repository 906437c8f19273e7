//! Aggregate counters exposed by the stats endpoint

use serde::Serialize;

/// Store-wide chat statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStats {
    pub total_messages: i64,
    /// Distinct authors over the last 24 hours
    pub total_users: i64,
    pub total_rooms: i64,
    /// Sessions active within the last 5 minutes
    pub active_users: i64,
    pub messages_last_24h: i64,
}

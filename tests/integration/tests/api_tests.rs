//! HTTP surface tests
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, TestServer};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.expect("Request failed");
    let body = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["env"], "development");
    assert!(body["uptimeSeconds"].is_u64());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/rooms").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_api_responses_are_gzipped_on_request() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .client
        .get(format!("{}/api/rooms", server.base_url()))
        .header("accept-encoding", "gzip")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-encoding")
            .and_then(|v| v.to_str().ok()),
        Some("gzip")
    );

    let plain = server.get("/api/rooms").await.unwrap();
    assert!(plain.headers().get("content-encoding").is_none());
}

// ============================================================================
// Stats Tests
// ============================================================================

#[tokio::test]
async fn test_stats_counts_messages_and_connections() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    alice.send("send-message", json!({ "text": "hello" })).await.unwrap();
    alice.expect("new-message").await.unwrap();

    let response = server.get("/api/stats").await.unwrap();
    let body = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["totalMessages"], 1);
    assert_eq!(body["totalRooms"], 3);
    assert_eq!(body["connectedUsers"], 1);
    assert_eq!(body["messagesLast24h"], 1);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_stats_store_failure_is_500() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.faults.fail_reads(true);

    let response = server.get("/api/stats").await.unwrap();
    let body = assert_json(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();

    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains("injected"));
    assert!(body["error"]["code"].is_string());
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_list_rooms_with_activity() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", Some("tech")).await.unwrap();
    alice.send("send-message", json!({ "text": "ship it" })).await.unwrap();
    alice.expect("new-message").await.unwrap();

    let response = server.get("/api/rooms").await.unwrap();
    let body = assert_json(response, StatusCode::OK).await.unwrap();
    let rooms = body.as_array().unwrap();

    assert_eq!(rooms.len(), 3);
    assert_eq!(rooms[0]["name"], "tech");
    assert_eq!(rooms[0]["messageCount"], 1);
    assert!(rooms[0]["lastActivity"].is_string());
    assert_eq!(rooms[0]["createdBy"], "system");
    assert!(rooms[1]["lastActivity"].is_null());
}

#[tokio::test]
async fn test_room_history_oldest_first() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    for text in ["one", "two", "three"] {
        alice.send("send-message", json!({ "text": text })).await.unwrap();
        alice.expect("new-message").await.unwrap();
    }

    let response = server
        .get("/api/rooms/general/messages?limit=2")
        .await
        .unwrap();
    let body = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["room"], "general");
    let texts: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["text"].as_str())
        .collect();
    assert_eq!(texts, vec!["two", "three"]);
}

#[tokio::test]
async fn test_room_search_case_insensitive() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    for text in ["Hello there", "unrelated", "say hello"] {
        alice.send("send-message", json!({ "text": text })).await.unwrap();
        alice.expect("new-message").await.unwrap();
    }

    let response = server
        .get("/api/rooms/general/messages?q=HELLO")
        .await
        .unwrap();
    let body = assert_json(response, StatusCode::OK).await.unwrap();

    let texts: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["text"].as_str())
        .collect();
    assert_eq!(texts, vec!["say hello", "Hello there"]);
}

#[tokio::test]
async fn test_room_messages_bad_limit() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get("/api/rooms/general/messages?limit=0")
        .await
        .unwrap();
    let body = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let response = server
        .get("/api/rooms/general/messages?limit=abc")
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Rate Limiting Tests
// ============================================================================

#[tokio::test]
async fn test_rate_limit_applies_to_api_only() {
    let server = TestServer::start_with(&[
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1"),
        ("RATE_LIMIT_BURST", "2"),
    ])
    .await
    .expect("Failed to start server");

    let mut statuses = Vec::new();
    for _ in 0..4 {
        statuses.push(server.get("/api/rooms").await.unwrap().status());
    }
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));

    for _ in 0..4 {
        let response = server.get("/health").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

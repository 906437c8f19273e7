//! WebSocket gateway tests
//!
//! Each test starts its own server on an ephemeral port over the in-memory
//! store.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{eventually, names, TestServer};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

const QUIET: Duration = Duration::from_millis(300);

fn roster_names(event: &Value) -> Vec<String> {
    event["data"]["users"]
        .as_array()
        .map(|users| {
            users
                .iter()
                .filter_map(|u| u["username"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Join
// ============================================================================

#[tokio::test]
async fn test_join_sends_session_roster_and_history() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.connect().await.unwrap();

    alice
        .send("join", json!({ "username": "alice", "room": "tech" }))
        .await
        .unwrap();

    let joined = alice.recv().await.unwrap();
    assert_eq!(joined["event"], "user-joined");
    assert_eq!(joined["data"]["username"], "alice");
    assert_eq!(joined["data"]["room"], "tech");
    assert_eq!(joined["data"]["avatar"], "A");

    let roster = alice.recv().await.unwrap();
    assert_eq!(roster["event"], "room-users");
    assert_eq!(roster_names(&roster), vec!["alice"]);

    let history = alice.recv().await.unwrap();
    assert_eq!(history["event"], "message-history");
    assert_eq!(history["data"]["room"], "tech");
    assert_eq!(history["data"]["messages"], json!([]));
}

#[tokio::test]
async fn test_zero_sized_settings_refused_at_startup() {
    for key in [
        "OUTBOUND_BUFFER",
        "HEARTBEAT_INTERVAL_MS",
        "SESSION_CLEANUP_INTERVAL_SECS",
        "HISTORY_LIMIT",
    ] {
        let result = TestServer::start_with(&[(key, "0")]).await;
        let err = result.err().unwrap_or_else(|| panic!("{key}=0 was accepted"));
        assert!(err.to_string().contains(key), "{err}");
    }
}

#[tokio::test]
async fn test_join_chat_alias_and_fallback_name() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    client.send("join-chat", json!({ "username": "   " })).await.unwrap();

    let joined = client.expect("user-joined").await.unwrap();
    let name = joined["data"]["username"].as_str().unwrap();
    assert!(name.starts_with("User"));
    assert_eq!(name.len(), 8);
    assert_eq!(joined["data"]["room"], "general");
}

#[tokio::test]
async fn test_second_join_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();

    alice.send("join", json!({ "username": "mallory" })).await.unwrap();

    let error = alice.expect("error").await.unwrap();
    assert_eq!(error["data"]["kind"], "validation");

    assert_eq!(server.state.registry().session_count(), 1);
    let session = server.store.session_count();
    assert_eq!(session, 1);
}

#[tokio::test]
async fn test_events_before_join_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    client
        .send("send-message", json!({ "text": "hello" }))
        .await
        .unwrap();

    let error = client.expect("error").await.unwrap();
    assert_eq!(error["data"]["kind"], "not-joined");
    assert!(server.store.messages_in("general").is_empty());
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_message_reaches_room_members_only() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    let mut bob = server.join("bob", None).await.unwrap();
    let mut carol = server.join("carol", Some("tech")).await.unwrap();

    alice
        .send("send-message", json!({ "text": "  hi all  " }))
        .await
        .unwrap();

    for client in [&mut alice, &mut bob] {
        let message = client.expect("new-message").await.unwrap();
        assert_eq!(message["data"]["text"], "hi all");
        assert_eq!(message["data"]["username"], "alice");
        assert_eq!(message["data"]["room"], "general");
        assert_eq!(message["data"]["messageType"], "user");
    }

    let to_carol = carol.drain(QUIET).await.unwrap();
    assert!(!names(&to_carol).contains(&"new-message".to_string()));
    assert_eq!(server.store.messages_in("general").len(), 1);
}

#[tokio::test]
async fn test_messages_delivered_in_commit_order() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    let mut bob = server.join("bob", None).await.unwrap();

    for i in 0..20 {
        alice
            .send("send-message", json!({ "text": format!("m{i}") }))
            .await
            .unwrap();
    }

    let mut received = Vec::new();
    while received.len() < 20 {
        let message = bob.expect("new-message").await.unwrap();
        received.push(message["data"]["text"].as_str().unwrap().to_string());
    }
    let expected: Vec<String> = (0..20).map(|i| format!("m{i}")).collect();
    assert_eq!(received, expected);

    let stored: Vec<String> = server
        .store
        .messages_in("general")
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_too_long_message_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();

    alice
        .send("send-message", json!({ "text": "x".repeat(1001) }))
        .await
        .unwrap();

    let error = alice.expect("error").await.unwrap();
    assert_eq!(error["data"]["kind"], "validation");
    assert!(server.store.messages_in("general").is_empty());
}

#[tokio::test]
async fn test_history_sent_on_join() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    alice.send("send-message", json!({ "text": "first" })).await.unwrap();
    alice.expect("new-message").await.unwrap();

    let mut bob = server.connect().await.unwrap();
    bob.send("join", json!({ "username": "bob" })).await.unwrap();

    let history = bob.expect("message-history").await.unwrap();
    let messages = history["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["text"], "first");
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_switch_room_notifies_both_rooms() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    let mut bob = server.join("bob", None).await.unwrap();
    let mut carol = server.join("carol", Some("tech")).await.unwrap();
    alice.drain(QUIET).await.unwrap();

    bob.send("join-room", json!({ "room": "tech" })).await.unwrap();

    let changed = bob.expect("room-changed").await.unwrap();
    assert_eq!(changed["data"]["room"], "tech");
    bob.expect("message-history").await.unwrap();

    let left = alice.expect("user-left").await.unwrap();
    assert_eq!(left["data"]["username"], "bob");
    assert_eq!(left["data"]["room"], "general");

    let arrived = carol.expect("user-joined-room").await.unwrap();
    assert_eq!(arrived["data"]["username"], "bob");

    assert_eq!(server.state.membership().members_of("tech").len(), 2);
    assert_eq!(server.state.membership().members_of("general").len(), 1);
}

#[tokio::test]
async fn test_create_room_broadcast() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    let mut bob = server.join("bob", Some("random")).await.unwrap();

    alice
        .send(
            "create-room",
            json!({ "name": "dev", "description": "builds and releases" }),
        )
        .await
        .unwrap();

    let success = alice.expect("room-create-success").await.unwrap();
    assert_eq!(success["data"]["name"], "dev");
    assert!(success["data"].get("passwordHash").is_none());

    let created = bob.expect("room-created").await.unwrap();
    assert_eq!(created["data"]["name"], "dev");
    assert_eq!(created["data"]["createdBy"], "alice");

    alice
        .send("create-room", json!({ "name": "dev" }))
        .await
        .unwrap();
    let error = alice.expect("error").await.unwrap();
    assert_eq!(error["data"]["kind"], "duplicate-room");
}

#[tokio::test]
async fn test_list_rooms() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();

    alice.send("list-rooms", Value::Null).await.unwrap();

    let list = alice.expect("room-list").await.unwrap();
    let rooms: Vec<&str> = list["data"]["rooms"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(rooms.len(), 3);
    for name in ["general", "random", "tech"] {
        assert!(rooms.contains(&name));
    }
}

// ============================================================================
// Typing
// ============================================================================

#[tokio::test]
async fn test_typing_relayed_to_others() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    let mut bob = server.join("bob", None).await.unwrap();
    alice.drain(QUIET).await.unwrap();

    alice.send("typing-start", Value::Null).await.unwrap();

    let typing = bob.expect("user-typing").await.unwrap();
    assert_eq!(typing["data"]["username"], "alice");
    assert_eq!(typing["data"]["isTyping"], true);

    let echoed = alice.drain(QUIET).await.unwrap();
    assert!(!names(&echoed).contains(&"user-typing".to_string()));
}

// ============================================================================
// Disconnect and malformed input
// ============================================================================

#[tokio::test]
async fn test_disconnect_updates_roster() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    let bob = server.join("bob", None).await.unwrap();

    bob.close().await.unwrap();

    let mut last_roster = None;
    loop {
        let event = alice.recv().await.unwrap();
        match event["event"].as_str() {
            Some("room-users") => last_roster = Some(roster_names(&event)),
            Some("user-disconnected") => {
                assert_eq!(event["data"]["username"], "bob");
                break;
            }
            _ => {}
        }
    }
    assert_eq!(last_roster, Some(vec!["alice".to_string()]));

    let state = server.state.clone();
    assert!(eventually(|| state.registry().session_count() == 1).await);
    let store = server.store.clone();
    assert!(eventually(|| store.session_count() == 1).await);
}

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut client = server.connect().await.unwrap();

    client
        .send_raw(Message::Text("not json".to_string()))
        .await
        .unwrap();
    let error = client.expect("error").await.unwrap();
    assert_eq!(error["data"]["kind"], "validation");

    client
        .send_raw(Message::Binary(vec![1, 2, 3]))
        .await
        .unwrap();
    let error = client.expect("error").await.unwrap();
    assert_eq!(error["data"]["kind"], "validation");

    client.send("no-such-event", Value::Null).await.unwrap();
    client.expect("error").await.unwrap();

    client.send("join", json!({ "username": "alice" })).await.unwrap();
    client.expect("message-history").await.unwrap();
}

#[tokio::test]
async fn test_storage_failure_does_not_broadcast() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut alice = server.join("alice", None).await.unwrap();
    let mut bob = server.join("bob", None).await.unwrap();

    server.faults.fail_saves(true);
    alice.send("send-message", json!({ "text": "lost" })).await.unwrap();

    let error = alice.expect("error").await.unwrap();
    assert_eq!(error["data"]["kind"], "persistence");

    let to_bob = bob.drain(QUIET).await.unwrap();
    assert!(!names(&to_bob).contains(&"new-message".to_string()));
}

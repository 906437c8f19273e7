//! Join handler

use std::sync::Arc;

use chat_core::entities::normalize_room_name;
use chat_core::DEFAULT_ROOM;

use super::{send_history, sync_session, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{JoinPayload, PresencePayload, ServerEvent};
use crate::server::GatewayState;

/// Handles `join`
pub struct JoinHandler;

impl JoinHandler {
    /// Register the session and place it in its first room
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: JoinPayload,
    ) -> HandlerResult<()> {
        let room = match payload.room.as_deref() {
            Some(room) => normalize_room_name(room)?,
            None => DEFAULT_ROOM.to_string(),
        };
        let requested = payload.username.as_deref().unwrap_or_default();

        let session = state.registry().register(connection.id(), requested, &room)?;
        connection.try_send(ServerEvent::user_joined(&session));

        if state.presence().enter(connection, &room).is_none() {
            // Torn down between dispatch and registration
            state.registry().unregister(connection.id());
            return Ok(());
        }

        tracing::info!(
            connection_id = %connection.id(),
            username = %session.display_name,
            room = %room,
            "User joined"
        );

        state.presence().notify(
            &room,
            &ServerEvent::UserConnected(PresencePayload::new(&session.display_name, &room)),
            Some(connection.id()),
        );

        if !sync_session(state, connection, &session).await {
            return Ok(());
        }

        send_history(state, connection, &room).await
    }
}

#[cfg(test)]
mod tests {
    use chat_common::ErrorKind;
    use chat_core::NewMessage;
    use chat_core::traits::MessageRepository;

    use super::*;
    use crate::handlers::test_support::{events, names, TestGateway};

    #[tokio::test]
    async fn test_join_sends_session_roster_and_history() {
        let gw = TestGateway::new().await;
        MessageRepository::save(gw.store.as_ref(), &NewMessage::system("general", "welcome"))
            .await
            .unwrap();

        let (conn, mut rx) = gw.connect("a");
        gw.join(&conn, "alice", None).await.unwrap();

        let received = events(&mut rx);
        assert_eq!(names(&received), vec!["user-joined", "room-users", "message-history"]);

        match &received[0] {
            ServerEvent::UserJoined(view) => {
                assert_eq!(view.username, "alice");
                assert_eq!(view.room, "general");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match &received[2] {
            ServerEvent::MessageHistory(p) => assert_eq!(p.messages.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }

        assert!(gw.store.has_session(conn.id()));
        assert_eq!(gw.store.session_room(conn.id()).as_deref(), Some("general"));
    }

    #[tokio::test]
    async fn test_join_announces_to_room() {
        let gw = TestGateway::new().await;
        let (alice, mut rx_a) = gw.connect("a");
        gw.join(&alice, "alice", Some("tech")).await.unwrap();
        events(&mut rx_a);

        let (bob, _rx_b) = gw.connect("b");
        gw.join(&bob, "bob", Some("tech")).await.unwrap();

        let received = events(&mut rx_a);
        assert_eq!(names(&received), vec!["room-users", "user-connected"]);
        match &received[0] {
            ServerEvent::RoomUsers(p) => {
                assert_eq!(p.room, "tech");
                assert_eq!(p.users.len(), 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_join_rejected() {
        let gw = TestGateway::new().await;
        let (conn, _rx) = gw.connect("a");
        gw.join(&conn, "alice", None).await.unwrap();

        let err = gw.join(&conn, "mallory", Some("tech")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let session = gw.state.registry().lookup(conn.id()).unwrap();
        assert_eq!(session.display_name, "alice");
        assert_eq!(gw.state.membership().room_of(conn.id()).as_deref(), Some("general"));
    }

    #[tokio::test]
    async fn test_join_rejects_bad_room() {
        let gw = TestGateway::new().await;
        let (conn, _rx) = gw.connect("a");

        let err = gw.join(&conn, "alice", Some("   ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!gw.state.registry().is_registered(conn.id()));
    }

    #[tokio::test]
    async fn test_join_after_teardown_leaves_nothing_behind() {
        let gw = TestGateway::new().await;
        let (conn, _rx) = gw.connect("a");
        conn.mark_dead();

        JoinHandler::handle(
            &gw.state,
            &conn,
            JoinPayload {
                username: Some("late".to_string()),
                room: None,
            },
        )
        .await
        .unwrap();

        assert!(!gw.state.registry().is_registered(conn.id()));
        assert!(gw.state.membership().members_of("general").is_empty());
        assert!(!gw.store.has_session(conn.id()));
    }
}

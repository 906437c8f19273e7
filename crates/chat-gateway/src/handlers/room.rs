//! Room handlers: switch, create, list

use std::sync::Arc;

use chat_core::entities::normalize_room_name;
use chat_core::{NewRoom, Session};

use super::{send_history, sync_session, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{
    CreateRoomPayload, JoinRoomPayload, PresencePayload, RoomCreatedPayload, RoomListPayload,
    ServerEvent,
};
use crate::server::GatewayState;

/// Handles `join-room`, `create-room` and `list-rooms`
pub struct RoomHandler;

impl RoomHandler {
    /// Move the connection to another room
    pub async fn switch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: JoinRoomPayload,
    ) -> HandlerResult<()> {
        let session = state.registry().lookup(connection.id())?;
        let room = normalize_room_name(&payload.room)?;

        if session.is_in(&room) {
            connection.try_send(ServerEvent::room_changed(&room));
            return send_history(state, connection, &room).await;
        }

        state.typing().clear(connection, &session);

        let Some(transition) = state.presence().enter(connection, &room) else {
            return Ok(());
        };

        let username = &session.display_name;
        if let Some(vacated) = transition.vacated() {
            state.presence().notify(
                vacated,
                &ServerEvent::UserLeft(PresencePayload::new(username, vacated)),
                Some(connection.id()),
            );
        }
        state.presence().notify(
            &room,
            &ServerEvent::UserJoinedRoom(PresencePayload::new(username, &room)),
            Some(connection.id()),
        );
        connection.try_send(ServerEvent::room_changed(&room));

        tracing::info!(
            connection_id = %connection.id(),
            username = %username,
            from = ?transition.previous,
            to = %room,
            "User switched room"
        );

        let moved = Session {
            current_room: room.clone(),
            ..session
        };
        if !sync_session(state, connection, &moved).await {
            return Ok(());
        }

        send_history(state, connection, &room).await
    }

    /// Create a room on behalf of the joined user
    pub async fn create(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: CreateRoomPayload,
    ) -> HandlerResult<()> {
        let session = state.registry().lookup(connection.id())?;

        let mut request = NewRoom::new(
            &payload.name,
            payload.description.unwrap_or_default(),
            &session.display_name,
        )?;
        if payload.is_private {
            request = request.private(payload.password_hash);
        }

        let room = state.directory().create(request).await?;

        let sent = state
            .registry()
            .broadcast(&ServerEvent::RoomCreated(RoomCreatedPayload::from(&room)));
        tracing::info!(
            connection_id = %connection.id(),
            room = %room.name,
            notified = sent,
            "Room created"
        );

        connection.try_send(ServerEvent::RoomCreateSuccess(room));
        Ok(())
    }

    /// Send the directory listing to the requester
    pub async fn list(state: &GatewayState, connection: &Arc<Connection>) -> HandlerResult<()> {
        let rooms = state.directory().list().await?;
        connection.try_send(ServerEvent::RoomList(RoomListPayload { rooms }));
        Ok(())
    }
}

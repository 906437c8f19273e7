//! Client event handlers
//!
//! One event per connection is handled at a time. Handlers may suspend on
//! the store; after every suspension they re-check that the connection is
//! still live before touching shared state.

mod disconnect;
mod error;
mod join;
mod message;
mod room;
mod typing;

#[cfg(test)]
mod test_support;

pub use disconnect::DisconnectHandler;
pub use error::{HandlerError, HandlerResult};
pub use join::JoinHandler;
pub use message::MessageHandler;
pub use room::RoomHandler;
pub use typing::TypingHandler;

use std::sync::Arc;

use chat_core::Session;
use chat_service::SessionService;

use crate::connection::Connection;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::server::GatewayState;

/// Routes decoded client events to handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Dispatch one client event
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        event: ClientEvent,
    ) -> HandlerResult<()> {
        if !connection.is_alive() {
            return Ok(());
        }

        tracing::trace!(
            connection_id = %connection.id(),
            event = event.name(),
            "Dispatching client event"
        );

        match event {
            ClientEvent::Join(payload) => JoinHandler::handle(state, connection, payload).await,
            ClientEvent::SendMessage(payload) => {
                MessageHandler::handle(state, connection, payload).await
            }
            ClientEvent::JoinRoom(payload) => RoomHandler::switch(state, connection, payload).await,
            ClientEvent::CreateRoom(payload) => {
                RoomHandler::create(state, connection, payload).await
            }
            ClientEvent::ListRooms => RoomHandler::list(state, connection).await,
            ClientEvent::TypingStart => TypingHandler::handle(state, connection, true),
            ClientEvent::TypingStop => TypingHandler::handle(state, connection, false),
        }
    }

    /// Decode a text frame and dispatch it
    pub async fn dispatch_text(
        state: &GatewayState,
        connection: &Arc<Connection>,
        text: &str,
    ) -> HandlerResult<()> {
        let event = ClientEvent::from_json(text)?;
        Self::dispatch(state, connection, event).await
    }
}

/// Upsert the durable session row, undoing it if the connection died meanwhile
///
/// Returns `false` when the connection was torn down during the write.
/// Durable rows are bookkeeping only, so a failed write is logged and ignored.
async fn sync_session(state: &GatewayState, connection: &Connection, session: &Session) -> bool {
    let sessions = SessionService::new(state.service_context());
    sessions.save(session).await.ok();

    if state.is_live(connection) {
        return true;
    }

    tracing::debug!(
        connection_id = %connection.id(),
        "Connection closed during session write, removing row"
    );
    sessions.remove(connection.id()).await.ok();
    false
}

/// Send the recent history of `room` to one connection
async fn send_history(
    state: &GatewayState,
    connection: &Connection,
    room: &str,
) -> HandlerResult<()> {
    let limit = state.config().gateway.history_limit;
    let messages = state.pipeline().history(room, limit).await?;

    if connection.is_alive() {
        connection.try_send(ServerEvent::history(room, messages));
    }
    Ok(())
}

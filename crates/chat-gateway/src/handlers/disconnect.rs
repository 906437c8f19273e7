//! Disconnect handler
//!
//! Teardown runs exactly once per connection, whichever of the socket
//! tasks notices the end first.

use std::sync::Arc;

use chat_service::SessionService;

use crate::connection::Connection;
use crate::protocol::{PresencePayload, ServerEvent};
use crate::server::GatewayState;

pub struct DisconnectHandler;

impl DisconnectHandler {
    /// Tear down registry, membership and durable session state
    ///
    /// Returns `false` if teardown had already run.
    pub async fn handle(state: &GatewayState, connection: &Arc<Connection>) -> bool {
        if !connection.mark_dead() {
            return false;
        }

        let id = connection.id();
        state.registry().remove_connection(id);

        if let Ok(session) = state.registry().lookup(id) {
            state.typing().clear(connection, &session);
        }

        let (room, session) = state.presence().depart(id);

        if let (Some(room), Some(session)) = (&room, &session) {
            state.presence().notify(
                room,
                &ServerEvent::UserDisconnected(PresencePayload::new(&session.display_name, room)),
                None,
            );
        }

        if session.is_some() {
            SessionService::new(state.service_context())
                .remove(id)
                .await
                .ok();
        }

        tracing::info!(
            connection_id = %id,
            username = session.as_ref().map(|s| s.display_name.as_str()),
            room = room.as_deref(),
            connected_secs = connection.connected_for().as_secs(),
            "Connection torn down"
        );
        true
    }
}

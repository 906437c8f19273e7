//! Typing handler

use std::sync::Arc;

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;

/// Handles `typing-start` and `typing-stop`
pub struct TypingHandler;

impl TypingHandler {
    pub fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        is_typing: bool,
    ) -> HandlerResult<()> {
        let notified = state.typing().set_typing(connection, is_typing)?;
        tracing::trace!(
            connection_id = %connection.id(),
            is_typing,
            notified,
            "Typing state relayed"
        );
        Ok(())
    }
}

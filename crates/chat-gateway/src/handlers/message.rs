//! Send-message handler

use std::sync::Arc;

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::SendMessagePayload;
use crate::server::GatewayState;

/// Handles `send-message`
pub struct MessageHandler;

impl MessageHandler {
    /// Submit to the pipeline; the writer broadcasts after commit
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: SendMessagePayload,
    ) -> HandlerResult<()> {
        let message = state
            .pipeline()
            .submit(connection.id(), &payload.text)
            .await?;

        tracing::debug!(
            connection_id = %connection.id(),
            message_id = message.id,
            room = %message.room,
            "Message delivered"
        );
        Ok(())
    }
}

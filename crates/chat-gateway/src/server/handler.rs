//! WebSocket handler
//!
//! One task reads frames and dispatches them, one drains the outbound queue
//! and pings the peer, one watches for silence. Whichever ends first
//! triggers teardown.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chat_core::ConnectionId;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::connection::Connection;
use crate::handlers::{DisconnectHandler, HandlerError, MessageDispatcher};
use crate::protocol::ServerEvent;
use crate::server::GatewayState;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let id = ConnectionId::from(uuid::Uuid::new_v4().to_string());
    let gateway = &state.config().gateway;

    let (tx, mut rx) = mpsc::channel::<ServerEvent>(gateway.outbound_buffer);
    let connection = Connection::new(id.clone(), tx);
    state.registry().add_connection(Arc::clone(&connection));

    tracing::info!(connection_id = %id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    let state_recv = state.clone();
    let connection_recv = Arc::clone(&connection);
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = ws_stream.next().await {
            if !connection_recv.is_alive() {
                break;
            }

            match frame {
                Ok(Message::Text(text)) => {
                    connection_recv.record_activity();
                    let result =
                        MessageDispatcher::dispatch_text(&state_recv, &connection_recv, &text)
                            .await;
                    if let Err(e) = result {
                        report(&connection_recv, &e);
                    }
                }
                Ok(Message::Binary(_)) => {
                    connection_recv.record_activity();
                    report(
                        &connection_recv,
                        &HandlerError::invalid_payload("binary frames are not supported"),
                    );
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Axum answers pings itself
                    connection_recv.record_activity();
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_recv.id(), "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    break;
                }
            }
        }
    });

    let id_send = id.clone();
    let ping_every = gateway.heartbeat_interval();
    let mut send_task = tokio::spawn(async move {
        let mut pings = interval(ping_every);
        pings.tick().await;

        loop {
            let frame = tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => match event.to_json() {
                        Ok(json) => Message::Text(json.into()),
                        Err(e) => {
                            tracing::error!(
                                connection_id = %id_send,
                                event = event.name(),
                                error = %e,
                                "Failed to encode event"
                            );
                            continue;
                        }
                    },
                    None => break,
                },
                _ = pings.tick() => Message::Ping(Vec::new()),
            };

            if ws_sink.send(frame).await.is_err() {
                tracing::debug!(connection_id = %id_send, "Failed to write to WebSocket");
                break;
            }
        }

        let _ = ws_sink.close().await;
    });

    let connection_hb = Arc::clone(&connection);
    let timeout = gateway.heartbeat_timeout();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut ticker = interval(ping_every);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let idle = connection_hb.time_since_activity();
            if idle > timeout {
                tracing::warn!(
                    connection_id = %connection_hb.id(),
                    idle_ms = idle.as_millis(),
                    "Connection timed out"
                );
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(connection_id = %id, "Receive task ended");
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %id, "Send task ended");
        }
        _ = &mut heartbeat_task => {
            tracing::debug!(connection_id = %id, "Heartbeat task ended");
        }
    }

    DisconnectHandler::handle(&state, &connection).await;

    recv_task.abort();
    heartbeat_task.abort();
    send_task.abort();
}

/// Log a failed event and tell the client why
fn report(connection: &Connection, error: &HandlerError) {
    tracing::warn!(
        connection_id = %connection.id(),
        kind = ?error.kind(),
        error = %error,
        "Handler error"
    );
    connection.try_send(error.to_event());
}

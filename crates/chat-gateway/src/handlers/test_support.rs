//! Shared fixtures for handler tests

use std::sync::Arc;

use chat_common::AppConfig;
use chat_core::ConnectionId;
use chat_db::{FaultyStore, MemoryStore};
use chat_service::{RoomDirectory, ServiceContextBuilder};
use tokio::sync::mpsc;

use super::{HandlerResult, JoinHandler, MessageDispatcher};
use crate::connection::Connection;
use crate::protocol::{ClientEvent, JoinPayload, ServerEvent};
use crate::server::GatewayState;

pub(crate) struct TestGateway {
    pub state: GatewayState,
    pub store: Arc<MemoryStore>,
    pub faults: Arc<FaultyStore>,
}

impl TestGateway {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let faults = Arc::new(FaultyStore::new(Arc::clone(&store)));
        let ctx = ServiceContextBuilder::new()
            .store(Arc::clone(&faults))
            .build()
            .unwrap();

        let directory = RoomDirectory::new(ctx.clone());
        directory.load().await.unwrap();

        let config = AppConfig::from_lookup(|_| None).unwrap();
        let state = GatewayState::new(ctx, Arc::new(directory), config);

        Self {
            state,
            store,
            faults,
        }
    }

    pub fn connect(&self, id: &str) -> (Arc<Connection>, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(256);
        let conn = Connection::new(ConnectionId::from(id), tx);
        self.state.registry().add_connection(Arc::clone(&conn));
        (conn, rx)
    }

    pub async fn join(
        &self,
        conn: &Arc<Connection>,
        name: &str,
        room: Option<&str>,
    ) -> HandlerResult<()> {
        let payload = JoinPayload {
            username: Some(name.to_string()),
            room: room.map(str::to_string),
        };
        JoinHandler::handle(&self.state, conn, payload).await
    }

    pub async fn dispatch(&self, conn: &Arc<Connection>, json: &str) -> HandlerResult<()> {
        let event = ClientEvent::from_json(json)?;
        MessageDispatcher::dispatch(&self.state, conn, event).await
    }
}

/// Everything queued so far
pub(crate) fn events(rx: &mut mpsc::Receiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

pub(crate) fn names(events: &[ServerEvent]) -> Vec<&'static str> {
    events.iter().map(ServerEvent::name).collect()
}

/// Usernames of every roster received for `room`, in arrival order
pub(crate) fn rosters_for(events: &[ServerEvent], room: &str) -> Vec<Vec<String>> {
    events
        .iter()
        .filter_map(|e| match e {
            ServerEvent::RoomUsers(p) if p.room == room => {
                Some(p.users.iter().map(|u| u.username.clone()).collect())
            }
            _ => None,
        })
        .collect()
}

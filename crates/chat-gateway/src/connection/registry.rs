//! Connection registry
//!
//! Maps live connections to their session identity. The registry is the
//! only owner of [`Session`] values; everything else holds copies.

use std::sync::Arc;

use chat_core::{ConnectionId, DomainError, Session};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::Connection;
use crate::protocol::ServerEvent;

/// Registry of sockets and their sessions
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<Connection>>,
    sessions: DashMap<ConnectionId, Session>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            sessions: DashMap::new(),
        }
    }

    /// Create a new shared registry
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // =========================================================================
    // Sockets
    // =========================================================================

    /// Track an accepted socket
    pub fn add_connection(&self, connection: Arc<Connection>) {
        tracing::debug!(connection_id = %connection.id(), "Connection added");
        self.connections.insert(connection.id().clone(), connection);
    }

    /// Stop tracking a socket
    pub fn remove_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.remove(id).map(|(_, conn)| conn)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(id).map(|c| c.value().clone())
    }

    /// Queue an event for one connection
    pub fn send_to(&self, id: &ConnectionId, event: ServerEvent) -> bool {
        match self.connection(id) {
            Some(conn) => conn.try_send(event),
            None => false,
        }
    }

    /// Queue an event for every connection, joined or not
    pub fn broadcast(&self, event: &ServerEvent) -> usize {
        let targets: Vec<Arc<Connection>> =
            self.connections.iter().map(|c| c.value().clone()).collect();

        let sent = targets
            .iter()
            .filter(|conn| conn.try_send(event.clone()))
            .count();

        tracing::trace!(event = event.name(), sent = sent, "Event broadcast to all");
        sent
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Bind a session to a connection
    ///
    /// A blank name gets a generated fallback. Fails when the connection
    /// already has a session; the existing one is left untouched.
    pub fn register(
        &self,
        id: &ConnectionId,
        requested_name: &str,
        room: &str,
    ) -> Result<Session, DomainError> {
        match self.sessions.entry(id.clone()) {
            Entry::Occupied(_) => Err(DomainError::AlreadyRegistered(id.clone())),
            Entry::Vacant(slot) => {
                let session = Session::new(id.clone(), requested_name, room)?;
                slot.insert(session.clone());
                Ok(session)
            }
        }
    }

    pub fn lookup(&self, id: &ConnectionId) -> Result<Session, DomainError> {
        self.sessions
            .get(id)
            .map(|s| s.clone())
            .ok_or_else(|| DomainError::SessionNotFound(id.clone()))
    }

    pub fn is_registered(&self, id: &ConnectionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Drop a session; no-op when absent
    pub fn unregister(&self, id: &ConnectionId) -> Option<Session> {
        self.sessions.remove(id).map(|(_, session)| session)
    }

    /// Point a session at a new room
    ///
    /// Only the membership index calls this, while it holds its write lock.
    pub(crate) fn set_current_room(&self, id: &ConnectionId, room: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) => {
                session.current_room = room.to_string();
                true
            }
            None => false,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connection_count())
            .field("sessions", &self.session_count())
            .finish()
    }
}

//! WebSocket connection handle
//!
//! One per accepted socket. Owns the outbound queue and the per-connection
//! flags read by the coordination core.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chat_core::ConnectionId;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::protocol::ServerEvent;

/// Handle to a live WebSocket connection
pub struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<ServerEvent>,
    /// Cleared exactly once, when teardown starts
    alive: AtomicBool,
    typing: AtomicBool,
    last_seen: Mutex<Instant>,
    connected_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, sender: mpsc::Sender<ServerEvent>) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            id,
            sender,
            alive: AtomicBool::new(true),
            typing: AtomicBool::new(false),
            last_seen: Mutex::new(now),
            connected_at: now,
        })
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queue an event without waiting
    ///
    /// Returns `false` when the event was dropped because the peer is gone
    /// or its outbound queue is full.
    pub fn try_send(&self, event: ServerEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    connection_id = %self.id,
                    event = event.name(),
                    "Outbound queue full, dropping event"
                );
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Check whether teardown has started
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Mark the connection as torn down
    ///
    /// Returns `true` only for the first caller.
    pub fn mark_dead(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    /// Record inbound traffic (any frame, including pongs)
    pub fn record_activity(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    pub fn time_since_activity(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }

    /// Set the typing flag, returning the previous value
    pub fn set_typing(&self, typing: bool) -> bool {
        self.typing.swap(typing, Ordering::AcqRel)
    }

    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .field("typing", &self.is_typing())
            .finish()
    }
}

//! Typing relay
//!
//! Ephemeral typing flags, fanned out to the rest of the room. Nothing here
//! is persisted and there is no expiry: a flag lasts until the next signal,
//! a room switch, or disconnect.

use std::sync::Arc;

use chat_core::{DomainError, Session};

use super::PresenceBroadcaster;
use crate::connection::Connection;
use crate::protocol::ServerEvent;

pub struct TypingRelay {
    presence: Arc<PresenceBroadcaster>,
}

impl TypingRelay {
    pub fn new(presence: Arc<PresenceBroadcaster>) -> Self {
        Self { presence }
    }

    /// Record the flag and tell every other member of the sender's room
    ///
    /// Returns the number of members notified.
    pub fn set_typing(&self, connection: &Connection, is_typing: bool) -> Result<usize, DomainError> {
        let session = self.presence.registry().lookup(connection.id())?;
        connection.set_typing(is_typing);

        Ok(self.presence.notify(
            &session.current_room,
            &ServerEvent::typing(&session.display_name, is_typing),
            Some(connection.id()),
        ))
    }

    /// Clear the flag before the connection leaves `session.current_room`
    ///
    /// Sends a final `isTyping: false` only when the flag was set.
    pub fn clear(&self, connection: &Connection, session: &Session) -> bool {
        if !connection.set_typing(false) {
            return false;
        }

        self.presence.notify(
            &session.current_room,
            &ServerEvent::typing(&session.display_name, false),
            Some(connection.id()),
        );
        true
    }
}

impl std::fmt::Debug for TypingRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingRelay").finish_non_exhaustive()
    }
}

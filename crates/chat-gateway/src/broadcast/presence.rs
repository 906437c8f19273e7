//! Presence broadcaster
//!
//! Every membership change and every room fanout goes through here. Rosters
//! are always recomputed in full from the membership index, and they are
//! emitted while the index lock is held, so the sequence of rosters a member
//! receives follows the sequence of membership changes exactly.

use std::sync::Arc;

use chat_core::{ConnectionId, Session};

use crate::connection::{
    Connection, ConnectionRegistry, MembershipTable, RoomMembershipIndex, Transition,
};
use crate::protocol::{ServerEvent, SessionView};

/// Roster and room-scoped fanout
pub struct PresenceBroadcaster {
    registry: Arc<ConnectionRegistry>,
    membership: Arc<RoomMembershipIndex>,
}

impl PresenceBroadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>, membership: Arc<RoomMembershipIndex>) -> Self {
        Self {
            registry,
            membership,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn membership(&self) -> &RoomMembershipIndex {
        &self.membership
    }

    /// Send the full roster of `room` to each of its members
    pub fn announce(&self, room: &str) -> usize {
        self.membership.read(|table| self.emit_roster(table, room))
    }

    /// Place a connection in `room` and announce the affected rosters
    ///
    /// Returns `None` without touching anything when the connection is being
    /// torn down or has no session. The session's `current_room` is updated
    /// under the same lock as the membership move.
    pub fn enter(&self, connection: &Connection, room: &str) -> Option<Transition> {
        let id = connection.id();

        self.membership.update(|table| {
            if !connection.is_alive() || !self.registry.is_registered(id) {
                return None;
            }

            let transition = table.join(id, room);
            if transition.is_noop() {
                return Some(transition);
            }

            self.registry.set_current_room(id, room);
            if let Some(vacated) = transition.vacated() {
                self.emit_roster(table, vacated);
            }
            self.emit_roster(table, room);

            Some(transition)
        })
    }

    /// Remove a connection from its room and drop its session
    ///
    /// The vacated room's roster is announced before the lock is released.
    pub fn depart(&self, id: &ConnectionId) -> (Option<String>, Option<Session>) {
        self.membership.update(|table| {
            let room = table.leave(id);
            let session = self.registry.unregister(id);

            if let Some(room) = &room {
                self.emit_roster(table, room);
            }

            (room, session)
        })
    }

    /// Send `event` to every member of `room`, optionally skipping one
    pub fn notify(&self, room: &str, event: &ServerEvent, except: Option<&ConnectionId>) -> usize {
        self.membership
            .read(|table| self.fanout(table, room, event, except))
    }

    fn emit_roster(&self, table: &MembershipTable, room: &str) -> usize {
        let event = ServerEvent::roster(room, self.resolve(table, room));
        self.fanout(table, room, &event, None)
    }

    fn resolve(&self, table: &MembershipTable, room: &str) -> Vec<SessionView> {
        let mut users: Vec<SessionView> = table
            .members_of(room)
            .iter()
            .filter_map(|id| self.registry.lookup(id).ok())
            .map(|session| SessionView::from(&session))
            .collect();
        users.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then_with(|| a.id.cmp(&b.id)));
        users
    }

    fn fanout(
        &self,
        table: &MembershipTable,
        room: &str,
        event: &ServerEvent,
        except: Option<&ConnectionId>,
    ) -> usize {
        let sent = table
            .members_of(room)
            .iter()
            .filter(|member| except != Some(*member))
            .filter(|member| self.registry.send_to(member, event.clone()))
            .count();

        tracing::trace!(room = %room, event = event.name(), sent = sent, "Event dispatched to room");
        sent
    }
}

impl std::fmt::Debug for PresenceBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceBroadcaster")
            .field("registry", &self.registry)
            .finish()
    }
}

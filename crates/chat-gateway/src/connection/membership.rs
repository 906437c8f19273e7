//! Room membership index
//!
//! Maps rooms to their current members. A connection belongs to at most one
//! room; moving it is a single step under one write lock, so no reader ever
//! sees it in two rooms or in none.

use std::collections::{HashMap, HashSet};

use chat_core::ConnectionId;
use parking_lot::RwLock;

/// Result of a join: where the connection came from and where it is now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<String>,
    pub room: String,
}

impl Transition {
    /// The connection was already in the target room
    pub fn is_noop(&self) -> bool {
        self.previous.as_deref() == Some(self.room.as_str())
    }

    /// Room that lost a member, if any
    pub fn vacated(&self) -> Option<&str> {
        match self.previous.as_deref() {
            Some(prev) if prev != self.room => Some(prev),
            _ => None,
        }
    }
}

/// Plain membership table; always accessed through the index lock
#[derive(Debug, Default)]
pub struct MembershipTable {
    rooms: HashMap<String, HashSet<ConnectionId>>,
    locations: HashMap<ConnectionId, String>,
}

impl MembershipTable {
    /// Move `id` into `room`, leaving its previous room
    pub fn join(&mut self, id: &ConnectionId, room: &str) -> Transition {
        let previous = self.locations.get(id).cloned();

        if previous.as_deref() == Some(room) {
            return Transition {
                previous,
                room: room.to_string(),
            };
        }

        if let Some(prev) = &previous {
            self.detach(id, prev);
        }

        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(id.clone());
        self.locations.insert(id.clone(), room.to_string());

        Transition {
            previous,
            room: room.to_string(),
        }
    }

    /// Remove `id` from whatever room holds it
    pub fn leave(&mut self, id: &ConnectionId) -> Option<String> {
        let room = self.locations.remove(id)?;
        self.detach(id, &room);
        Some(room)
    }

    /// Members of `room`, sorted for stable output
    pub fn members_of(&self, room: &str) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self
            .rooms
            .get(room)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    pub fn room_of(&self, id: &ConnectionId) -> Option<&str> {
        self.locations.get(id).map(String::as_str)
    }

    pub fn contains(&self, room: &str, id: &ConnectionId) -> bool {
        self.rooms.get(room).is_some_and(|set| set.contains(id))
    }

    /// Rooms with at least one member
    pub fn occupied_rooms(&self) -> Vec<&str> {
        self.rooms.keys().map(String::as_str).collect()
    }

    /// Number of connections placed in a room
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn detach(&mut self, id: &ConnectionId, room: &str) {
        if let Some(set) = self.rooms.get_mut(room) {
            set.remove(id);
            if set.is_empty() {
                self.rooms.remove(room);
            }
        }
    }
}

/// Process-wide room membership index
#[derive(Debug, Default)]
pub struct RoomMembershipIndex {
    table: RwLock<MembershipTable>,
}

impl RoomMembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically move `id` into `room`
    pub fn join(&self, id: &ConnectionId, room: &str) -> Transition {
        self.table.write().join(id, room)
    }

    /// Remove `id` from its room; idempotent
    pub fn leave(&self, id: &ConnectionId) -> Option<String> {
        self.table.write().leave(id)
    }

    pub fn members_of(&self, room: &str) -> Vec<ConnectionId> {
        self.table.read().members_of(room)
    }

    pub fn room_of(&self, id: &ConnectionId) -> Option<String> {
        self.table.read().room_of(id).map(str::to_string)
    }

    /// Run `f` with exclusive access
    ///
    /// Anything `f` emits is ordered with respect to every other membership
    /// change. `f` must not block or re-enter the index.
    pub fn update<R>(&self, f: impl FnOnce(&mut MembershipTable) -> R) -> R {
        f(&mut self.table.write())
    }

    /// Run `f` against a consistent snapshot
    pub fn read<R>(&self, f: impl FnOnce(&MembershipTable) -> R) -> R {
        f(&self.table.read())
    }
}

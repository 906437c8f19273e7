//! Room directory
//!
//! Process-wide catalog of rooms. Names are reserved before the store is
//! awaited so two concurrent creates of one name cannot both succeed.

use std::collections::{BTreeMap, HashSet};

use chat_core::entities::{NewRoom, Room, RoomSummary, DEFAULT_ROOMS, SYSTEM_USER};
use chat_core::DomainError;
use parking_lot::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Catalog of rooms, mirrored from the room repository
pub struct RoomDirectory {
    ctx: ServiceContext,
    rooms: RwLock<BTreeMap<String, Room>>,
    pending: Mutex<HashSet<String>>,
}

impl RoomDirectory {
    /// Create an empty directory; call [`RoomDirectory::load`] before use
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            rooms: RwLock::new(BTreeMap::new()),
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Read every room from the store, seeding the default rooms if missing
    #[instrument(skip(self))]
    pub async fn load(&self) -> ServiceResult<usize> {
        let mut rooms = self.ctx.room_repo().find_all().await?;

        for (name, description) in DEFAULT_ROOMS {
            if rooms.iter().any(|r| r.name == name) {
                continue;
            }
            let seed = NewRoom::new(name, description, SYSTEM_USER)?;
            match self.ctx.room_repo().create(&seed).await {
                Ok(room) => rooms.push(room),
                // Seeded concurrently by another instance
                Err(DomainError::DuplicateRoom(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let mut cache = self.rooms.write();
        for room in rooms {
            cache.insert(room.name.clone(), room);
        }

        info!(rooms = cache.len(), "Room directory loaded");
        Ok(cache.len())
    }

    /// Create a room
    ///
    /// Fails with `DuplicateRoom` when the name exists or is being created.
    /// A failed create leaves the directory unchanged.
    #[instrument(skip(self, request), fields(room = %request.name, creator = %request.created_by))]
    pub async fn create(&self, request: NewRoom) -> ServiceResult<Room> {
        let reservation = self.reserve(&request.name)?;

        let room = match self.ctx.room_repo().create(&request).await {
            Ok(room) => room,
            Err(e) => {
                if e.is_infrastructure() {
                    warn!(error = %e, "Room creation failed");
                }
                return Err(e.into());
            }
        };

        self.rooms.write().insert(room.name.clone(), room.clone());
        drop(reservation);

        info!("Room created");
        Ok(room)
    }

    /// Every room with its message count and last activity, most recent first
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<RoomSummary>> {
        let activity = self.ctx.message_repo().activity().await?;
        let rooms: Vec<Room> = self.rooms.read().values().cloned().collect();
        Ok(RoomSummary::merge(rooms, &activity))
    }

    /// Look up a room by name
    pub fn get(&self, name: &str) -> Option<Room> {
        self.rooms.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rooms.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rooms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.read().is_empty()
    }

    fn reserve(&self, name: &str) -> ServiceResult<Reservation<'_>> {
        let mut pending = self.pending.lock();
        if self.rooms.read().contains_key(name) || pending.contains(name) {
            return Err(ServiceError::Domain(DomainError::DuplicateRoom(
                name.to_string(),
            )));
        }
        pending.insert(name.to_string());

        Ok(Reservation {
            pending: &self.pending,
            name: name.to_string(),
        })
    }
}

impl std::fmt::Debug for RoomDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomDirectory")
            .field("rooms", &self.len())
            .finish()
    }
}

/// Pending name claim, released on drop (including cancellation)
struct Reservation<'a> {
    pending: &'a Mutex<HashSet<String>>,
    name: String,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.name);
    }
}

//! Persistence ports consumed by the coordination core

mod repositories;

pub use repositories::{
    MessageRepository, RepoResult, RoomRepository, SessionRepository, StatsRepository,
};

//! # chat-service
//!
//! Application layer containing services, the room directory, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    MessageService, RoomDirectory, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SessionService, StatsService,
};

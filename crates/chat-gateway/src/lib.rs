//! # chat-gateway
//!
//! Real-time coordination core for room-based chat, served over WebSocket,
//! with a small read-only HTTP surface alongside.

pub mod api;
pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};

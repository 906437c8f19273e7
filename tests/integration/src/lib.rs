//! Integration test utilities for the chat server
//!
//! This crate provides helpers for running end-to-end tests against
//! the WebSocket gateway and its HTTP routes.

pub mod helpers;
pub mod ws;

pub use helpers::*;
pub use ws::{names, WsClient};

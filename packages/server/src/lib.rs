//! Room-based group chat relay.
//!
//! Clients join numbered rooms over WebSocket, exchange messages, and a
//! per-room admin can remove members, hand over the role or end the room.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

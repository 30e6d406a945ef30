//! Shared utilities for the roomchat workspace.

pub mod logger;
pub mod time;

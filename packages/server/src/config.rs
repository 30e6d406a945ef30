//! Server configuration, assembled from the command line and validated before
//! anything is bound.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::RoomPolicy;

/// Default number of messages replayed to a joiner
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Host must not be empty")]
    EmptyHost,

    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),

    #[error("max_rooms ({max_rooms}) cannot exceed max_room_id ({max_room_id})")]
    RoomsExceedIds { max_rooms: usize, max_room_id: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub policy: RoomPolicy,
    pub history_limit: usize,
    /// Seed for admin election; `None` draws from the OS
    pub election_seed: Option<u64>,
    /// Token table for `StaticTokenIdentityProvider`; guests are accepted when unset
    pub tokens_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            policy: RoomPolicy::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            election_seed: None,
            tokens_file: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.policy.max_room_id == 0 {
            return Err(ConfigError::ZeroLimit("max_room_id"));
        }
        if self.policy.max_rooms == 0 {
            return Err(ConfigError::ZeroLimit("max_rooms"));
        }
        if self.policy.max_members == 0 {
            return Err(ConfigError::ZeroLimit("max_members"));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::ZeroLimit("history_limit"));
        }
        if self.policy.max_rooms as u64 > u64::from(self.policy.max_room_id) {
            return Err(ConfigError::RoomsExceedIds {
                max_rooms: self.policy.max_rooms,
                max_room_id: self.policy.max_room_id,
            });
        }
        Ok(())
    }
}

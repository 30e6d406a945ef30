//! Static Token Identity Provider
//!
//! 起動時に JSON ファイルから読み込んだトークン表でクレデンシャルを検証します。
//!
//! ```json
//! {
//!   "s3cr3t-token": { "user_id": "u-alice", "display_name": "Alice" }
//! }
//! ```

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Identity, IdentityError, IdentityProvider, UserId};

#[derive(Debug, Error)]
pub enum TokenTableError {
    #[error("Failed to read token file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed token table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid entry for token '{0}': user_id must not be empty")]
    InvalidEntry(String),
}

#[derive(Debug, Deserialize)]
struct TokenEntry {
    user_id: String,
    display_name: String,
}

pub struct StaticTokenIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenIdentityProvider {
    pub fn new(tokens: HashMap<String, Identity>) -> Self {
        Self { tokens }
    }

    pub fn from_json(json: &str) -> Result<Self, TokenTableError> {
        let entries: HashMap<String, TokenEntry> = serde_json::from_str(json)?;
        let mut tokens = HashMap::with_capacity(entries.len());
        for (token, entry) in entries {
            let user_id = UserId::new(entry.user_id)
                .map_err(|_| TokenTableError::InvalidEntry(token.clone()))?;
            tokens.insert(
                token,
                Identity {
                    user_id,
                    display_name: entry.display_name,
                },
            );
        }
        Ok(Self::new(tokens))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TokenTableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TokenTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let provider = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} token(s) from '{}'",
            provider.len(),
            path.display()
        );
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<Identity, IdentityError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(IdentityError::MissingCredential);
        }
        self.tokens
            .get(credential)
            .cloned()
            .ok_or(IdentityError::Unauthenticated)
    }
}

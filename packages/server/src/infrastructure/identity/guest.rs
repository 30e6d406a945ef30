//! Guest Identity Provider
//!
//! 開発用の認証プロバイダ。提示された文字列をそのまま表示名として受け入れ、
//! 接続ごとに新しいゲスト用の user_id を発行します。

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Identity, IdentityError, IdentityProvider, UserId};

#[derive(Debug, Default, Clone, Copy)]
pub struct GuestIdentityProvider;

#[async_trait]
impl IdentityProvider for GuestIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<Identity, IdentityError> {
        let display_name = credential.trim();
        if display_name.is_empty() {
            return Err(IdentityError::MissingCredential);
        }
        let user_id = UserId::new(format!("guest-{}", Uuid::new_v4()))
            .map_err(|_| IdentityError::Unauthenticated)?;
        Ok(Identity {
            user_id,
            display_name: display_name.to_string(),
        })
    }
}

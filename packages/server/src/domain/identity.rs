//! Identity Provider trait 定義
//!
//! 接続ごとに一度だけ呼ばれ、提示されたクレデンシャルを検証して
//! `Identity` を返します。

use async_trait::async_trait;

use super::{Identity, IdentityError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify the credential presented when the connection was opened.
    async fn verify(&self, credential: &str) -> Result<Identity, IdentityError>;
}

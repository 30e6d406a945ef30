//! 認証プロバイダの実装
//!
//! - `guest`: クレデンシャルをそのまま表示名として扱う（開発用）
//! - `static_token`: JSON ファイルから読み込んだトークン表で検証する

pub mod guest;
pub mod static_token;

pub use guest::GuestIdentityProvider;
pub use static_token::StaticTokenIdentityProvider;

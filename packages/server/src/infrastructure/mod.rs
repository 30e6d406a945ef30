//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装（インメモリのリポジトリ、
//! WebSocket による通知、インメモリの履歴ストア、認証プロバイダ）と、
//! ワイヤ形式の DTO を提供します。

pub mod dto;
pub mod history;
pub mod identity;
pub mod message_pusher;
pub mod repository;

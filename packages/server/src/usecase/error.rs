//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{MessagePushError, RoomId};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Failed to greet connection: {0}")]
    GreetingFailed(#[from] MessagePushError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),
}

//! History Store trait 定義
//!
//! ルームごとのメッセージ履歴を保存する外部ストアへのインターフェース。
//! 失敗はすべて呼び出し側でログに記録され、ルームの動作を止めることはありません。

use async_trait::async_trait;

use super::{ChatMessage, HistoryError, RoomId};

/// Message history collaborator, keyed by room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one message (fire-and-forget from the room's point of view)
    async fn append(&self, room_id: RoomId, message: ChatMessage) -> Result<(), HistoryError>;

    /// The latest `limit` messages, oldest first
    async fn fetch_recent(
        &self,
        room_id: RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, HistoryError>;

    /// Drop everything stored for the room
    async fn purge(&self, room_id: RoomId) -> Result<(), HistoryError>;
}

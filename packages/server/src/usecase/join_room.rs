//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加通知・名簿・履歴の配信順序と配信先
//!
//! ### なぜこのテストが必要か
//! - 参加通知は既存メンバーにだけ、名簿は全員に、履歴は参加者にだけ届く
//! - 拒否された参加ではメンバー表が変わってはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルームへの参加
//! - 異常系：誤ったシークレット、重複したユーザー名、満員
//! - エッジケース：履歴ストアの障害（空の履歴で続行）

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::domain::{
    ConnectionId, HistoryStore, JoinRoom, MessagePusher, Notification, RoomError, RoomId,
    RoomRepository, RoomSecret, RoomView, UserId, Username,
};

use super::notify::{broadcast_or_warn, broadcast_roster, joined_text, push_or_warn, system_message};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
    history_limit: usize,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        history: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            history,
            clock,
            history_limit,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(RoomView)` - 参加後のルームの状態
    /// * `Err(RoomError)` - 参加拒否（状態は変更されない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        room_id: RoomId,
        username: Username,
        secret: Option<RoomSecret>,
    ) -> Result<RoomView, RoomError> {
        let _turn = self.repository.room_turn(room_id).await;
        let view = self
            .repository
            .join_room(JoinRoom {
                room_id,
                secret,
                username: username.clone(),
                connection_id,
                user_id,
            })
            .await?;
        tracing::info!("'{}' joined room {}", username, room_id);

        // 1. 既存メンバーへの参加通知
        let joined = system_message(self.clock.as_ref(), joined_text(&username));
        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &view.member_ids_except(&connection_id),
            &Notification::Message(joined),
        )
        .await;

        // 2. 全員に名簿
        broadcast_roster(self.message_pusher.as_ref(), &view).await;

        // 3. 参加者に履歴
        let messages = match self.history.fetch_recent(room_id, self.history_limit).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Failed to load history of room {}: {}", room_id, e);
                Vec::new()
            }
        };
        push_or_warn(
            self.message_pusher.as_ref(),
            &connection_id,
            &Notification::LoadMessages(messages),
        )
        .await;

        Ok(view)
    }
}

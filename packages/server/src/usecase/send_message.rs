//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者以外のメンバーへの配信と履歴への保存
//!
//! ### なぜこのテストが必要か
//! - メンバーでない接続からのメッセージは配信されてはいけない
//! - 著者名はクライアントの申告ではなくサーバー側のユーザー名を使う
//! - 履歴の保存に失敗しても配信は取り消されない
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーからの送信
//! - 異常系：メンバーでない接続からの送信
//! - エッジケース：送信者しかいないルーム、履歴ストアの障害

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, HistoryStore, MessageContent, MessagePusher, Notification,
    RoomId, RoomRepository,
};

use super::notify::{broadcast_or_warn, now_clock_time};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        history: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            history,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Some(ChatMessage)` - 配信されたメッセージ
    /// * `None` - 送信者がルームのメンバーではないため破棄した
    pub async fn execute(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
        content: MessageContent,
    ) -> Option<ChatMessage> {
        // 1. 手番を取得してから送信者と配信先を解決（履歴の保存まで保持する）
        let _turn = self.repository.room_turn(room_id).await;
        let Some((member, audience)) = self
            .repository
            .resolve_audience(room_id, &connection_id)
            .await
        else {
            tracing::warn!(
                "Dropping message from '{}': not a member of room {}",
                connection_id,
                room_id
            );
            return None;
        };

        // 2. 送信者以外に配信
        let message = ChatMessage::from_member(
            &member.username,
            content,
            now_clock_time(self.clock.as_ref()),
        );
        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &audience,
            &Notification::Message(message.clone()),
        )
        .await;

        // 3. 履歴に保存（失敗しても配信は取り消さない）
        if let Err(e) = self.history.append(room_id, message.clone()).await {
            tracing::warn!("Failed to persist message in room {}: {}", room_id, e);
        }

        Some(message)
    }
}

//! UseCase: 参加者接続処理
//!
//! 認証済みの接続を MessagePusher に登録し、接続 ID と Identity を
//! `connected` 通知でクライアントに知らせます。ルームへの参加は
//! この後の `create_room` / `join_room` で行われます。

use std::sync::Arc;

use crate::domain::{ConnectionId, Identity, MessagePusher, Notification, PusherChannel};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録と `connected` の送信に成功
    /// * `Err(ConnectError)` - `connected` を送れなかった（登録は解除済み）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        identity: Identity,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        let greeting = Notification::Connected {
            connection_id,
            identity,
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &greeting).await {
            self.message_pusher.unregister_client(&connection_id).await;
            return Err(e.into());
        }
        Ok(())
    }
}

//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - 作成者への room_created / update_user_list / load_messages の送信
//!
//! ### なぜこのテストが必要か
//! - 作成者はそのままルームの管理者になる
//! - 検証エラーのときはルームも通知も作られてはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：新しいルームの作成
//! - 異常系：既存のルーム、シークレットなし、範囲外の ID

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::domain::{
    ConnectionId, CreateRoom, HistoryStore, MessagePusher, Notification, RoomError, RoomId,
    RoomRepository, RoomSecret, RoomTitle, RoomView, Timestamp, UserId, Username,
};

use super::notify::{broadcast_roster, push_or_warn};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
    history_limit: usize,
}

impl CreateRoomUseCase {
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

    /// ルーム作成を実行
    ///
    /// 失敗時は何も変更せずに `RoomError` を返します。エラーを作成者に
    /// 知らせるのは呼び出し側（UI 層）の責務です。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        room_id: RoomId,
        username: Username,
        secret: Option<RoomSecret>,
        title: Option<RoomTitle>,
    ) -> Result<RoomView, RoomError> {
        // 同じルームの他のイベントとは、変更から通知・履歴操作まで交錯させない
        let _turn = self.repository.room_turn(room_id).await;
        let view = self
            .repository
            .create_room(CreateRoom {
                room_id,
                title,
                secret,
                username: username.clone(),
                connection_id,
                user_id,
                created_at: Timestamp::new(self.clock.now_jst_millis()),
            })
            .await?;
        tracing::info!("Room {} created by '{}'", room_id, username);

        push_or_warn(
            self.message_pusher.as_ref(),
            &connection_id,
            &Notification::RoomCreated { room_id, username },
        )
        .await;
        broadcast_roster(self.message_pusher.as_ref(), &view).await;

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

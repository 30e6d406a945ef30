//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 退出通知、管理者の再選出、最後のメンバーの退出によるルームの削除
//!
//! ### なぜこのテストが必要か
//! - 管理者が抜けてもルームには必ず管理者が 1 人いる必要がある
//! - 二重の退出で通知が 2 回送られてはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：一般メンバーの退出、管理者の退出
//! - エッジケース：最後のメンバーの退出、二重の退出

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::domain::{ConnectionId, Departure, HistoryStore, MessagePusher, RoomId, RoomRepository};

use super::notify::announce_departure;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
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

    /// ルーム退出を実行（冪等）
    pub async fn execute(&self, room_id: RoomId, connection_id: ConnectionId) -> Departure {
        let _turn = self.repository.room_turn(room_id).await;
        let departure = self.repository.depart(room_id, &connection_id).await;
        if departure == Departure::NotMember {
            tracing::debug!(
                "Connection '{}' is not in room {}, ignoring leave",
                connection_id,
                room_id
            );
        }
        announce_departure(
            self.message_pusher.as_ref(),
            self.history.as_ref(),
            self.clock.as_ref(),
            &departure,
        )
        .await;
        departure
    }
}

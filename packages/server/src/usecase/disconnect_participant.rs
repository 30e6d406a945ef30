//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断された接続の退出処理と MessagePusher からの登録解除
//!
//! ### なぜこのテストが必要か
//! - 明示的に退出しないまま切断されても、メンバー表に残ってはいけない
//! - 退出後の切断で退出通知が重複してはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルームにいる接続の切断
//! - エッジケース：どのルームにもいない接続の切断、退出済みの接続の切断

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::domain::{ConnectionId, Departure, HistoryStore, MessagePusher, RoomRepository};

use super::notify::announce_departure;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
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

    /// 切断処理を実行
    ///
    /// 接続がいるすべてのルームから、ルームごとに手番を取って退出させ、
    /// 最後に MessagePusher から登録を解除します。
    /// ソケットごとに 1 回だけ呼ばれる前提ですが、2 回目以降の呼び出しも無害です。
    pub async fn execute(&self, connection_id: ConnectionId) -> Vec<Departure> {
        let mut departures = Vec::new();
        for room_id in self.repository.rooms_of(&connection_id).await {
            let _turn = self.repository.room_turn(room_id).await;
            let departure = self.repository.depart(room_id, &connection_id).await;
            if departure == Departure::NotMember {
                continue;
            }
            announce_departure(
                self.message_pusher.as_ref(),
                self.history.as_ref(),
                self.clock.as_ref(),
                &departure,
            )
            .await;
            departures.push(departure);
        }
        self.message_pusher.unregister_client(&connection_id).await;
        tracing::info!(
            "Connection '{}' disconnected ({} room(s) left)",
            connection_id,
            departures.len()
        );
        departures
    }
}

//! UseCase: ルームの終了（管理者操作）
//!
//! 全メンバーに `room_ended` を送ってからルームとメンバー表を削除し、
//! 最後に履歴を削除します。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, EndedRoom, HistoryStore, MessagePusher, Notification, RoomId, RoomRepository,
};

use super::notify::{broadcast_or_warn, purge_history};

pub struct EndRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    history: Arc<dyn HistoryStore>,
}

impl EndRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            history,
        }
    }

    pub async fn execute(&self, room_id: RoomId, caller: ConnectionId) -> Option<EndedRoom> {
        // room_ended の送信と履歴の削除が終わるまで、同じ ID の作成を待たせる
        let _turn = self.repository.room_turn(room_id).await;
        let Some(ended) = self.repository.end_room(room_id, &caller).await else {
            tracing::warn!("Rejected end_room for room {} from '{}'", room_id, caller);
            return None;
        };
        tracing::info!(
            "Room {} ended by its admin ({} member(s))",
            room_id,
            ended.members.len()
        );

        let members: Vec<ConnectionId> = ended
            .members
            .iter()
            .map(|member| member.connection_id)
            .collect();
        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &members,
            &Notification::RoomEnded { room_id },
        )
        .await;
        purge_history(self.history.as_ref(), room_id).await;

        Some(ended)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use std::time::Duration;

    use crate::domain::{HistoryError, HistoryStore, MessageContent, MockHistoryStore};
    use crate::usecase::{CreateRoomUseCase, SendMessageUseCase, test_support::*};

    #[tokio::test]
    async fn test_admin_ends_room() {
        // テスト項目: 管理者がルームを終了すると全員に room_ended が届き、履歴が 1 回削除される
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = RecordingPusher::new();
        let (alice, bob) = (ConnectionId::generate(), ConnectionId::generate());
        seed_room(repository.as_ref(), 7, &[("alice", alice), ("bob", bob)]).await;
        let mut history = MockHistoryStore::new();
        history
            .expect_purge()
            .with(eq(room(7)))
            .times(1)
            .returning(|_| Ok(()));
        let usecase = EndRoomUseCase::new(repository.clone(), pusher.clone(), Arc::new(history));

        // when (操作):
        let ended = usecase.execute(room(7), alice).await;

        // then (期待する結果):
        assert_eq!(ended.unwrap().members.len(), 2);
        let expected = vec![Notification::RoomEnded { room_id: room(7) }];
        assert_eq!(pusher.sent_to(&alice), expected);
        assert_eq!(pusher.sent_to(&bob), expected);
        assert!(repository.get_room(room(7)).await.is_none());
    }

    #[tokio::test]
    async fn test_non_admin_cannot_end_room() {
        // テスト項目: 管理者以外の要求ではルームは終了せず、履歴も削除されない
        let repository = create_test_repository();
        let pusher = RecordingPusher::new();
        let (alice, bob) = (ConnectionId::generate(), ConnectionId::generate());
        seed_room(repository.as_ref(), 7, &[("alice", alice), ("bob", bob)]).await;
        let mut history = MockHistoryStore::new();
        history.expect_purge().times(0);
        let usecase = EndRoomUseCase::new(repository.clone(), pusher.clone(), Arc::new(history));

        let ended = usecase.execute(room(7), bob).await;

        assert!(ended.is_none());
        assert_eq!(pusher.total(), 0);
        assert!(repository.get_room(room(7)).await.is_some());
    }

    #[tokio::test]
    async fn test_purge_failure_is_not_fatal() {
        // テスト項目: 履歴の削除に失敗してもルームの終了は完了する
        let repository = create_test_repository();
        let alice = ConnectionId::generate();
        seed_room(repository.as_ref(), 7, &[("alice", alice)]).await;
        let mut history = MockHistoryStore::new();
        history
            .expect_purge()
            .times(1)
            .returning(|_| Err(HistoryError::Unavailable("timeout".to_string())));
        let usecase =
            EndRoomUseCase::new(repository.clone(), RecordingPusher::new(), Arc::new(history));

        assert!(usecase.execute(room(7), alice).await.is_some());
        assert!(repository.get_room(room(7)).await.is_none());
    }

    #[tokio::test]
    async fn test_message_saved_during_end_does_not_reach_new_room() {
        // テスト項目: 保存中のメッセージがあるルームを終了しても、同じ ID の新しいルームには残らない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = RecordingPusher::new();
        let history = GatedHistory::new();
        let (alice, bob, carol) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        seed_room(repository.as_ref(), 7, &[("alice", alice), ("bob", bob)]).await;
        let send = Arc::new(SendMessageUseCase::new(
            repository.clone(),
            pusher.clone(),
            history.clone(),
            test_clock(),
        ));
        let end = Arc::new(EndRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            history.clone(),
        ));
        let create = CreateRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            history.clone(),
            test_clock(),
            50,
        );

        // when (操作): bob のメッセージの保存を止めている間に alice がルームを終了
        history.gate.arm();
        let sending = {
            let send = send.clone();
            tokio::spawn(async move {
                let content = MessageContent::new("old secret".to_string()).unwrap();
                send.execute(room(7), bob, content).await
            })
        };
        history.gate.wait_entered().await;
        let mut ending = {
            let end = end.clone();
            tokio::spawn(async move { end.execute(room(7), alice).await })
        };
        let ended_early = tokio::time::timeout(Duration::from_millis(50), &mut ending).await;
        history.gate.release();
        assert!(sending.await.unwrap().is_some());
        assert!(ending.await.unwrap().is_some());
        create
            .execute(carol, user("carol"), room(7), name("carol"), secret("xyz"), None)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(ended_early.is_err());
        assert_eq!(
            pusher.sent_to(&carol).last(),
            Some(&Notification::LoadMessages(Vec::new()))
        );
        assert!(history.fetch_recent(room(7), 10).await.unwrap().is_empty());
    }
}

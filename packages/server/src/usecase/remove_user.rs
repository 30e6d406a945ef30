//! UseCase: メンバーの強制退出（管理者操作）

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, Notification, Removal, RoomId, RoomRepository};

use super::notify::{
    KICKED_REASON, broadcast_or_warn, broadcast_roster, push_or_warn, removed_text,
    system_message,
};

/// メンバー強制退出のユースケース
pub struct RemoveUserUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RemoveUserUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 管理者以外からの要求や、対象がメンバーでない場合は何もせず `None` を返します。
    pub async fn execute(
        &self,
        room_id: RoomId,
        caller: ConnectionId,
        target: ConnectionId,
    ) -> Option<Removal> {
        let _turn = self.repository.room_turn(room_id).await;
        let Some(removal) = self.repository.remove_member(room_id, &caller, &target).await else {
            tracing::warn!(
                "Rejected remove_user in room {} from '{}' targeting '{}'",
                room_id,
                caller,
                target
            );
            return None;
        };
        tracing::info!("'{}' removed from room {}", removal.removed.username, room_id);

        push_or_warn(
            self.message_pusher.as_ref(),
            &removal.removed.connection_id,
            &Notification::Kicked {
                room_id,
                reason: KICKED_REASON.to_string(),
            },
        )
        .await;
        let notice = system_message(
            self.clock.as_ref(),
            removed_text(&removal.removed.username),
        );
        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &removal.view.member_ids(),
            &Notification::Message(notice),
        )
        .await;
        broadcast_roster(self.message_pusher.as_ref(), &removal.view).await;

        Some(removal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::*;

    #[tokio::test]
    async fn test_admin_removes_member() {
        // テスト項目: 管理者は他のメンバーを退出させられ、対象には kicked が届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = RecordingPusher::new();
        let (alice, bob, carol) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        seed_room(
            repository.as_ref(),
            7,
            &[("alice", alice), ("bob", bob), ("carol", carol)],
        )
        .await;
        let usecase = RemoveUserUseCase::new(repository.clone(), pusher.clone(), test_clock());

        // when (操作):
        let removal = usecase.execute(room(7), alice, bob).await;

        // then (期待する結果):
        assert_eq!(removal.unwrap().removed.connection_id, bob);
        assert_eq!(
            pusher.sent_to(&bob),
            vec![Notification::Kicked {
                room_id: room(7),
                reason: KICKED_REASON.to_string(),
            }]
        );
        assert_eq!(pusher.messages_to(&carol), vec!["bob was removed from the room."]);
        let view = repository.get_room(room(7)).await.unwrap();
        assert_eq!(view.member_ids(), vec![alice, carol]);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_remove() {
        // テスト項目: 管理者以外の要求は黙って無視される
        let repository = create_test_repository();
        let pusher = RecordingPusher::new();
        let (alice, bob, carol) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        seed_room(
            repository.as_ref(),
            7,
            &[("alice", alice), ("bob", bob), ("carol", carol)],
        )
        .await;
        let usecase = RemoveUserUseCase::new(repository.clone(), pusher.clone(), test_clock());

        let removal = usecase.execute(room(7), bob, carol).await;

        assert!(removal.is_none());
        assert_eq!(pusher.total(), 0);
        assert_eq!(repository.get_room(room(7)).await.unwrap().roster.len(), 3);
    }

    #[tokio::test]
    async fn test_admin_cannot_remove_self() {
        // テスト項目: 管理者は自分自身を退出させられない
        let repository = create_test_repository();
        let alice = ConnectionId::generate();
        seed_room(repository.as_ref(), 7, &[("alice", alice)]).await;
        let usecase =
            RemoveUserUseCase::new(repository.clone(), RecordingPusher::new(), test_clock());

        assert!(usecase.execute(room(7), alice, alice).await.is_none());
        assert!(repository.get_room(room(7)).await.is_some());
    }
}

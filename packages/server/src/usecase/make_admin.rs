//! UseCase: 管理者の委譲（管理者操作）

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::domain::{
    AdminTransfer, ConnectionId, MessagePusher, Notification, RoomId, RoomRepository,
};

use super::notify::{admin_text, broadcast_or_warn, broadcast_roster, system_message};

pub struct MakeAdminUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl MakeAdminUseCase {
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

    pub async fn execute(
        &self,
        room_id: RoomId,
        caller: ConnectionId,
        target: ConnectionId,
    ) -> Option<AdminTransfer> {
        let _turn = self.repository.room_turn(room_id).await;
        let Some(transfer) = self.repository.make_admin(room_id, &caller, &target).await else {
            tracing::warn!(
                "Rejected make_admin in room {} from '{}' targeting '{}'",
                room_id,
                caller,
                target
            );
            return None;
        };
        tracing::info!(
            "'{}' is now the admin of room {}",
            transfer.new_admin.username,
            room_id
        );

        let notice = system_message(
            self.clock.as_ref(),
            admin_text(&transfer.new_admin.username),
        );
        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &transfer.view.member_ids(),
            &Notification::Message(notice),
        )
        .await;
        broadcast_roster(self.message_pusher.as_ref(), &transfer.view).await;

        Some(transfer)
    }
}

//! Server state shared by every handler.

use std::sync::Arc;

use roomchat_shared::time::Clock;

use crate::{
    domain::{HistoryStore, IdentityProvider, MessagePusher, RoomPolicy, RoomRepository},
    usecase::{
        ConnectParticipantUseCase, CreateRoomUseCase, DisconnectParticipantUseCase,
        EndRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        MakeAdminUseCase, RemoveUserUseCase, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// Limits, used to word validation errors
    pub policy: RoomPolicy,
    /// IdentityProvider（接続時の認証）
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// MessagePusher（検証エラーの通知に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub remove_user_usecase: Arc<RemoveUserUseCase>,
    pub make_admin_usecase: Arc<MakeAdminUseCase>,
    pub end_room_usecase: Arc<EndRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl AppState {
    /// Build every use case on top of the given collaborators.
    pub fn new(
        policy: RoomPolicy,
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        history: Arc<dyn HistoryStore>,
        identity_provider: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        Self {
            policy,
            identity_provider,
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                history.clone(),
                clock.clone(),
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                history.clone(),
                clock.clone(),
                history_limit,
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                history.clone(),
                clock.clone(),
                history_limit,
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                history.clone(),
                clock.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                history.clone(),
                clock.clone(),
            )),
            remove_user_usecase: Arc::new(RemoveUserUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            make_admin_usecase: Arc::new(MakeAdminUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            )),
            end_room_usecase: Arc::new(EndRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                history,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
            message_pusher,
        }
    }
}

//! UseCase 層
//!
//! プロトコルの各イベントと HTTP のクエリを 1 ユースケース 1 構造体で実装します。
//! ドメインの変更は `RoomRepository` を通じて 1 回のクリティカルセクションで行い、
//! 通知・履歴の保存などの外部協調者の呼び出しはその後にロックの外で行います。

mod connect_participant;
mod create_room;
mod disconnect_participant;
mod end_room;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod make_admin;
mod notify;
mod remove_user;
mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use end_room::EndRoomUseCase;
pub use error::{ConnectError, GetRoomDetailError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use make_admin::MakeAdminUseCase;
pub use remove_user::RemoveUserUseCase;
pub use send_message::SendMessageUseCase;

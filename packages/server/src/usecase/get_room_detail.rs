//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, RoomView};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: RoomId) -> Result<RoomView, GetRoomDetailError> {
        self.repository
            .get_room(room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound(room_id))
    }
}

//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{RoomRepository, RoomView};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 存在するすべてのルーム（ID の昇順）
    pub async fn execute(&self) -> Vec<RoomView> {
        self.repository.get_rooms().await
    }
}

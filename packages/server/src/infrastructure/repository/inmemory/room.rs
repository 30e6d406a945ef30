//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomRegistry` 集約を 1 つの `Mutex` で保護し、各イベントを 1 回の
//! クリティカルセクションで処理します。ロック内で `.await` はしないため、
//! 処理はルームの人数に比例する短時間で終わります。
//!
//! 外部協調者（履歴ストア・通知）の呼び出しは UseCase 層が集約のロックの外で、
//! ルームの手番を保持したまま行います。遅いストアが止めるのは同じルームの
//! イベントだけです。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    AdminElection, AdminTransfer, ConnectionId, CreateRoom, Departure, EndedRoom, JoinRoom,
    Member, Removal, RoomError, RoomId, RoomPolicy, RoomRegistry, RoomRepository, RoomTurn,
    RoomView,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// Room 登録簿とメンバー表の集約
    registry: Mutex<RoomRegistry>,
    /// ルーム ID ごとの手番（ID は `max_room_id` までなので削除しない）
    turns: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
    /// 範囲外の ID が共有する手番。作成も参加も必ず失敗する
    out_of_range_turn: Arc<Mutex<()>>,
    max_room_id: u32,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(policy: RoomPolicy, election: Box<dyn AdminElection>) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new(policy, election)),
            turns: Mutex::new(HashMap::new()),
            out_of_range_turn: Arc::new(Mutex::new(())),
            max_room_id: policy.max_room_id,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn room_turn(&self, room_id: RoomId) -> RoomTurn {
        let turn = if room_id.value() > self.max_room_id {
            self.out_of_range_turn.clone()
        } else {
            let mut turns = self.turns.lock().await;
            turns.entry(room_id).or_default().clone()
        };
        turn.lock_owned().await
    }

    async fn create_room(&self, request: CreateRoom) -> Result<RoomView, RoomError> {
        let mut registry = self.registry.lock().await;
        registry.create_room(request)
    }

    async fn join_room(&self, request: JoinRoom) -> Result<RoomView, RoomError> {
        let mut registry = self.registry.lock().await;
        registry.join_room(request)
    }

    async fn depart(&self, room_id: RoomId, connection_id: &ConnectionId) -> Departure {
        let mut registry = self.registry.lock().await;
        registry.depart(room_id, connection_id)
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let registry = self.registry.lock().await;
        registry.rooms_of(connection_id)
    }

    async fn remove_member(
        &self,
        room_id: RoomId,
        caller: &ConnectionId,
        target: &ConnectionId,
    ) -> Option<Removal> {
        let mut registry = self.registry.lock().await;
        registry.remove_member(room_id, caller, target)
    }

    async fn make_admin(
        &self,
        room_id: RoomId,
        caller: &ConnectionId,
        target: &ConnectionId,
    ) -> Option<AdminTransfer> {
        let mut registry = self.registry.lock().await;
        registry.make_admin(room_id, caller, target)
    }

    async fn end_room(&self, room_id: RoomId, caller: &ConnectionId) -> Option<EndedRoom> {
        let mut registry = self.registry.lock().await;
        registry.end_room(room_id, caller)
    }

    async fn resolve_audience(
        &self,
        room_id: RoomId,
        sender: &ConnectionId,
    ) -> Option<(Member, Vec<ConnectionId>)> {
        let registry = self.registry.lock().await;
        let member = registry.member(room_id, sender)?;
        let view = registry.snapshot(room_id)?;
        Some((member, view.member_ids_except(sender)))
    }

    async fn get_room(&self, room_id: RoomId) -> Option<RoomView> {
        let registry = self.registry.lock().await;
        registry.snapshot(room_id)
    }

    async fn get_rooms(&self) -> Vec<RoomView> {
        let registry = self.registry.lock().await;
        registry.list()
    }
}

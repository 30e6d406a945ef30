//! Repository trait 定義
//!
//! ルーム登録簿とメンバー表へのアクセスを抽象化します。
//! 各メソッドは 1 つのプロトコルイベントに対応し、同じルームに対する他の
//! イベントと決して交錯しない単位（アトミック）で実行されなければなりません。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 変更とその結果の通知・履歴操作を同じ順序で行うため、ルーム単位の
//! 「手番」（[`RoomTurn`]）を取得できます。同じルームを扱うユースケースは
//! 手番を取得してから変更を行い、通知と履歴操作が終わるまで保持します。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{
    AdminTransfer, ConnectionId, CreateRoom, Departure, EndedRoom, JoinRoom, Member, Removal,
    RoomError, RoomId, RoomView,
};

/// Exclusive turn on one room id. Dropping it lets the next event proceed.
pub type RoomTurn = OwnedMutexGuard<()>;

/// Room Repository trait
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームの手番を取得（同じルーム ID のイベントは到着順に 1 つずつ）
    async fn room_turn(&self, room_id: RoomId) -> RoomTurn;

    /// ルームを作成し、作成者を管理者として追加
    async fn create_room(&self, request: CreateRoom) -> Result<RoomView, RoomError>;

    /// 既存のルームに参加
    async fn join_room(&self, request: JoinRoom) -> Result<RoomView, RoomError>;

    /// ルームから退出（冪等）
    async fn depart(&self, room_id: RoomId, connection_id: &ConnectionId) -> Departure;

    /// 接続が所属しているルーム
    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// 管理者によるメンバー削除
    async fn remove_member(
        &self,
        room_id: RoomId,
        caller: &ConnectionId,
        target: &ConnectionId,
    ) -> Option<Removal>;

    /// 管理者権限の移譲
    async fn make_admin(
        &self,
        room_id: RoomId,
        caller: &ConnectionId,
        target: &ConnectionId,
    ) -> Option<AdminTransfer>;

    /// 管理者によるルーム終了
    async fn end_room(&self, room_id: RoomId, caller: &ConnectionId) -> Option<EndedRoom>;

    /// 送信者のメンバー情報と、送信者以外の配信先を取得
    async fn resolve_audience(
        &self,
        room_id: RoomId,
        sender: &ConnectionId,
    ) -> Option<(Member, Vec<ConnectionId>)>;

    /// ルームの現在の状態を取得
    async fn get_room(&self, room_id: RoomId) -> Option<RoomView>;

    /// 全てのルームを ID 順に取得
    async fn get_rooms(&self) -> Vec<RoomView>;
}

//! MessagePusher trait 定義
//!
//! ドメイン層が必要とする「クライアントへの通知」のインターフェース。
//! 通知はドメインの `Notification` として渡され、ワイヤ形式への変換は
//! Infrastructure 層の実装が担当します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    ChatMessage, ConnectionId, Identity, MessagePushError, RosterEntry, RoomId, Username,
};

/// Outbound channel of one connection (serialized JSON frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Outbound notification, delivered to one connection or to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Sent once when the socket opens
    Connected {
        connection_id: ConnectionId,
        identity: Identity,
    },
    JoinError {
        message: String,
    },
    CreateError {
        message: String,
    },
    RoomCreated {
        room_id: RoomId,
        username: Username,
    },
    /// Annotated roster after a membership change
    UserList(Vec<RosterEntry>),
    /// A chat line; author "System" for lifecycle notices
    Message(ChatMessage),
    /// Recent history for a joiner, oldest first
    LoadMessages(Vec<ChatMessage>),
    Kicked {
        room_id: RoomId,
        reason: String,
    },
    RoomEnded {
        room_id: RoomId,
    },
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な送信手段には依存しない。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続に通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に通知を送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}

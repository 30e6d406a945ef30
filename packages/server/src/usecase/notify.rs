//! 複数のユースケースで共有する通知の組み立てと送信
//!
//! 送信の失敗はログに記録するだけで、呼び出し元には返しません。
//! ドメインの変更はすでに確定しているためです。

use roomchat_shared::time::{Clock, timestamp_to_jst_clock_time};

use crate::domain::{
    ChatMessage, ConnectionId, Departure, HistoryStore, MessagePusher, Notification, RoomId,
    RoomView, Username,
};

pub(crate) fn now_clock_time(clock: &dyn Clock) -> String {
    timestamp_to_jst_clock_time(clock.now_jst_millis())
}

/// `System` 名義の通知メッセージ
pub(crate) fn system_message(clock: &dyn Clock, text: impl Into<String>) -> ChatMessage {
    ChatMessage::system(text, now_clock_time(clock))
}

pub(crate) fn joined_text(username: &Username) -> String {
    format!("{} has joined the chat.", username)
}

pub(crate) fn left_text(username: &Username) -> String {
    format!("{} has left the chat.", username)
}

pub(crate) fn admin_text(username: &Username) -> String {
    format!("{} is now the admin.", username)
}

pub(crate) fn removed_text(username: &Username) -> String {
    format!("{} was removed from the room.", username)
}

pub(crate) const KICKED_REASON: &str = "You were removed from the room by the admin.";

pub(crate) async fn push_or_warn(
    pusher: &dyn MessagePusher,
    target: &ConnectionId,
    notification: &Notification,
) {
    if let Err(e) = pusher.push_to(target, notification).await {
        tracing::warn!("Failed to notify connection '{}': {}", target, e);
    }
}

pub(crate) async fn broadcast_or_warn(
    pusher: &dyn MessagePusher,
    targets: &[ConnectionId],
    notification: &Notification,
) {
    if let Err(e) = pusher.broadcast(targets, notification).await {
        tracing::warn!("Failed to broadcast to {} connection(s): {}", targets.len(), e);
    }
}

/// 変更後の名簿をルームの全員に送信
pub(crate) async fn broadcast_roster(pusher: &dyn MessagePusher, view: &RoomView) {
    broadcast_or_warn(
        pusher,
        &view.member_ids(),
        &Notification::UserList(view.roster.clone()),
    )
    .await;
}

pub(crate) async fn purge_history(history: &dyn HistoryStore, room_id: RoomId) {
    match history.purge(room_id).await {
        Ok(()) => tracing::debug!("History of room {} purged", room_id),
        Err(e) => tracing::warn!("Failed to purge history of room {}: {}", room_id, e),
    }
}

/// 退出・切断の結果を残りのメンバーに知らせる
///
/// - `Left`: 退出通知、（必要なら）新しい管理者の通知、名簿
/// - `Closed`: 最後のメンバーだったので履歴を削除
pub(crate) async fn announce_departure(
    pusher: &dyn MessagePusher,
    history: &dyn HistoryStore,
    clock: &dyn Clock,
    departure: &Departure,
) {
    match departure {
        Departure::NotMember => {}
        Departure::Left {
            room_id,
            member,
            new_admin,
            view,
        } => {
            tracing::info!("'{}' left room {}", member.username, room_id);
            let audience = view.member_ids();
            let left = system_message(clock, left_text(&member.username));
            broadcast_or_warn(pusher, &audience, &Notification::Message(left)).await;
            if let Some(admin) = new_admin {
                tracing::info!("'{}' is now the admin of room {}", admin.username, room_id);
                let promoted = system_message(clock, admin_text(&admin.username));
                broadcast_or_warn(pusher, &audience, &Notification::Message(promoted)).await;
            }
            broadcast_roster(pusher, view).await;
        }
        Departure::Closed { room_id, member } => {
            tracing::info!(
                "'{}' was the last member, room {} closed",
                member.username,
                room_id
            );
            purge_history(history, *room_id).await;
        }
    }
}

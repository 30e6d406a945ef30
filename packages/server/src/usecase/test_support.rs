//! UseCase テスト用の共通部品

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use roomchat_shared::time::FixedClock;
use tokio::sync::Notify;

use crate::{
    domain::{
        ChatMessage, ConnectionId, FirstMemberElection, HistoryError, HistoryStore,
        MessagePushError, MessagePusher, Notification, PusherChannel, RoomId, RoomPolicy,
        RoomRepository, RoomSecret, UserId, Username,
    },
    infrastructure::{history::InMemoryHistoryStore, repository::InMemoryRoomRepository},
};

/// 2023-01-01 10:30 JST
pub(crate) const TEST_NOW_MILLIS: i64 = 1_672_536_600_000;
pub(crate) const TEST_TIME: &str = "10:30";

pub(crate) fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(TEST_NOW_MILLIS))
}

pub(crate) fn create_test_repository() -> Arc<InMemoryRoomRepository> {
    Arc::new(InMemoryRoomRepository::new(
        RoomPolicy::default(),
        Box::new(FirstMemberElection),
    ))
}

pub(crate) fn create_test_history() -> Arc<InMemoryHistoryStore> {
    Arc::new(InMemoryHistoryStore::default())
}

pub(crate) fn room(id: i64) -> RoomId {
    RoomId::new(id).unwrap()
}

pub(crate) fn name(value: &str) -> Username {
    Username::new(value.to_string()).unwrap()
}

pub(crate) fn user(value: &str) -> UserId {
    UserId::new(format!("uid-{}", value)).unwrap()
}

pub(crate) fn secret(value: &str) -> Option<RoomSecret> {
    RoomSecret::parse(Some(value))
}

/// 送信された通知を宛先ごとに記録する MessagePusher
#[derive(Default)]
pub(crate) struct RecordingPusher {
    sent: Mutex<Vec<(ConnectionId, Notification)>>,
    unregistered: Mutex<Vec<ConnectionId>>,
}

impl RecordingPusher {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 接続に届いた通知（送信順）
    pub(crate) fn sent_to(&self, connection_id: &ConnectionId) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| target == connection_id)
            .map(|(_, notification)| notification.clone())
            .collect()
    }

    /// 接続に届いたチャット行の本文
    pub(crate) fn messages_to(&self, connection_id: &ConnectionId) -> Vec<String> {
        self.sent_to(connection_id)
            .into_iter()
            .filter_map(|notification| match notification {
                Notification::Message(message) => Some(message.message),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn total(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(crate) fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub(crate) fn unregistered(&self) -> Vec<ConnectionId> {
        self.unregistered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.unregistered.lock().unwrap().push(*connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        self.sent
            .lock()
            .unwrap()
            .push((*connection_id, notification.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let mut sent = self.sent.lock().unwrap();
        for target in targets {
            sent.push((*target, notification.clone()));
        }
        Ok(())
    }
}

/// 1 回だけ呼び出しを止めておくための関門
///
/// `arm` の後で最初に `pass` した呼び出しは、`release` されるまで待たされます。
#[derive(Default)]
pub(crate) struct Gate {
    armed: AtomicBool,
    entered: Notify,
    released: Notify,
}

impl Gate {
    pub(crate) fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// 止められた呼び出しが関門に到達するまで待つ
    pub(crate) async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.released.notify_one();
    }

    async fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.released.notified().await;
        }
    }
}

/// `broadcast` を関門で止められる RecordingPusher
#[derive(Default)]
pub(crate) struct GatedPusher {
    pub(crate) inner: RecordingPusher,
    pub(crate) gate: Gate,
}

impl GatedPusher {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl MessagePusher for GatedPusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.inner.register_client(connection_id, sender).await;
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.inner.unregister_client(connection_id).await;
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        self.inner.push_to(connection_id, notification).await
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        self.gate.pass().await;
        self.inner.broadcast(targets, notification).await
    }
}

/// `append` を関門で止められる InMemoryHistoryStore
#[derive(Default)]
pub(crate) struct GatedHistory {
    pub(crate) inner: InMemoryHistoryStore,
    pub(crate) gate: Gate,
}

impl GatedHistory {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl HistoryStore for GatedHistory {
    async fn append(&self, room_id: RoomId, message: ChatMessage) -> Result<(), HistoryError> {
        self.gate.pass().await;
        self.inner.append(room_id, message).await
    }

    async fn fetch_recent(
        &self,
        room_id: RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, HistoryError> {
        self.inner.fetch_recent(room_id, limit).await
    }

    async fn purge(&self, room_id: RoomId) -> Result<(), HistoryError> {
        self.inner.purge(room_id).await
    }
}

/// ルームを作成済みの状態を用意する
pub(crate) async fn seed_room(
    repository: &dyn RoomRepository,
    room_id: i64,
    members: &[(&str, ConnectionId)],
) {
    use crate::domain::{CreateRoom, JoinRoom, Timestamp};

    let mut iter = members.iter();
    if let Some((owner, connection_id)) = iter.next() {
        repository
            .create_room(CreateRoom {
                room_id: room(room_id),
                title: None,
                secret: secret("abc"),
                username: name(owner),
                connection_id: *connection_id,
                user_id: user(owner),
                created_at: Timestamp::new(TEST_NOW_MILLIS),
            })
            .await
            .unwrap();
    }
    for (member, connection_id) in iter {
        repository
            .join_room(JoinRoom {
                room_id: room(room_id),
                secret: secret("abc"),
                username: name(member),
                connection_id: *connection_id,
                user_id: user(member),
            })
            .await
            .unwrap();
    }
}

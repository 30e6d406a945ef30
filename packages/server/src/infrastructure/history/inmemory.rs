//! InMemory History Store 実装
//!
//! ルームごとに最新 `capacity` 件だけを保持するリングバッファ。
//! プロセスの再起動で失われます。

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryError, HistoryStore, RoomId};

/// Per-room bound used when none is configured
pub const DEFAULT_CAPACITY: usize = 200;

pub struct InMemoryHistoryStore {
    logs: Mutex<HashMap<RoomId, VecDeque<ChatMessage>>>,
    capacity: usize,
}

impl InMemoryHistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            logs: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, room_id: RoomId, message: ChatMessage) -> Result<(), HistoryError> {
        let mut logs = self.logs.lock().await;
        let log = logs.entry(room_id).or_default();
        log.push_back(message);
        while log.len() > self.capacity {
            log.pop_front();
        }
        Ok(())
    }

    async fn fetch_recent(
        &self,
        room_id: RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, HistoryError> {
        let logs = self.logs.lock().await;
        let Some(log) = logs.get(&room_id) else {
            return Ok(Vec::new());
        };
        let skip = log.len().saturating_sub(limit);
        Ok(log.iter().skip(skip).cloned().collect())
    }

    async fn purge(&self, room_id: RoomId) -> Result<(), HistoryError> {
        let mut logs = self.logs.lock().await;
        if logs.remove(&room_id).is_some() {
            tracing::debug!("Purged history of room {}", room_id);
        }
        Ok(())
    }
}

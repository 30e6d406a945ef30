//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `"type"` in snake_case.

use serde::{Deserialize, Serialize};

/// Room id as sent by clients: a JSON number or a numeric string.
///
/// Anything else (fractions, booleans, numbers outside `i64`) lands in
/// `Other` so the frame still parses and the id fails validation instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRoomId {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

/// Client → server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    CreateRoom {
        #[serde(default)]
        room: Option<RawRoomId>,
        #[serde(default)]
        secret: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        username: String,
    },
    JoinRoom {
        #[serde(default)]
        room: Option<RawRoomId>,
        #[serde(default)]
        secret: Option<String>,
        #[serde(default)]
        username: String,
    },
    LeaveRoom {
        room: RawRoomId,
    },
    SendMessage {
        room: RawRoomId,
        message: String,
    },
    RemoveUser {
        room: RawRoomId,
        target: String,
    },
    MakeAdmin {
        room: RawRoomId,
        target: String,
    },
    EndRoom {
        room: RawRoomId,
    },
}

/// One roster line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

/// A chat line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub author: String,
    pub message: String,
    pub time: String,
}

/// Server → client notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected {
        connection_id: String,
        user_id: String,
        display_name: String,
    },
    JoinError {
        message: String,
    },
    CreateError {
        message: String,
    },
    RoomCreated {
        room: u32,
        username: String,
    },
    UpdateUserList {
        users: Vec<UserInfo>,
    },
    ReceiveMessage {
        author: String,
        message: String,
        time: String,
    },
    LoadMessages {
        messages: Vec<MessageInfo>,
    },
    Kicked {
        room: u32,
        reason: String,
    },
    RoomEnded {
        room: u32,
    },
}

//! エンティティ

use super::value_object::{
    ConnectionId, MessageContent, RoomId, RoomSecret, RoomTitle, Timestamp, UserId, Username,
};

/// Room metadata owned by the Room Directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub title: Option<RoomTitle>,
    pub access_secret: Option<RoomSecret>,
    /// Always a current member of the room
    pub admin: ConnectionId,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl Room {
    /// Whether `secret` opens this room. Rooms without a secret admit anyone.
    pub fn admits(&self, secret: Option<&RoomSecret>) -> bool {
        match &self.access_secret {
            None => true,
            Some(expected) => secret.is_some_and(|presented| expected.matches(presented)),
        }
    }

    pub fn is_admin(&self, connection_id: &ConnectionId) -> bool {
        &self.admin == connection_id
    }

    pub fn is_locked(&self) -> bool {
        self.access_secret.is_some()
    }
}

/// A connection's participation record in one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub user_id: UserId,
}

impl Member {
    pub fn new(connection_id: ConnectionId, username: Username, user_id: UserId) -> Self {
        Self {
            connection_id,
            username,
            user_id,
        }
    }
}

/// One line of the annotated roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub is_admin: bool,
}

/// A chat line as delivered to clients and kept in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: String,
    pub message: String,
    /// `HH:MM`
    pub time: String,
}

impl ChatMessage {
    /// Author name used for lifecycle notices
    pub const SYSTEM_AUTHOR: &'static str = "System";

    pub fn system(message: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            author: Self::SYSTEM_AUTHOR.to_string(),
            message: message.into(),
            time: time.into(),
        }
    }

    pub fn from_member(
        author: &Username,
        content: MessageContent,
        time: impl Into<String>,
    ) -> Self {
        Self {
            author: author.as_str().to_string(),
            message: content.into_string(),
            time: time.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.author == Self::SYSTEM_AUTHOR
    }
}

/// Authenticated identity attached to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: String,
}

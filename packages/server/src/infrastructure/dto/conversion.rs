//! Conversion logic between DTOs and domain entities.

use roomchat_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    ChatMessage, Notification, RosterEntry, RoomId, RoomView, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<&dto::RawRoomId> for RoomId {
    type Error = ValueObjectError;

    fn try_from(raw: &dto::RawRoomId) -> Result<Self, Self::Error> {
        match raw {
            dto::RawRoomId::Number(value) => RoomId::new(*value),
            dto::RawRoomId::Text(text) => RoomId::parse(text),
            dto::RawRoomId::Other(value) => {
                Err(ValueObjectError::MalformedRoomId(value.to_string()))
            }
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ChatMessage> for dto::MessageInfo {
    fn from(model: &ChatMessage) -> Self {
        Self {
            author: model.author.clone(),
            message: model.message.clone(),
            time: model.time.clone(),
        }
    }
}

impl From<&RosterEntry> for dto::UserInfo {
    fn from(model: &RosterEntry) -> Self {
        Self {
            id: model.connection_id.to_string(),
            username: model.username.as_str().to_string(),
            is_admin: model.is_admin,
        }
    }
}

impl From<&Notification> for dto::ServerMessage {
    fn from(model: &Notification) -> Self {
        match model {
            Notification::Connected {
                connection_id,
                identity,
            } => Self::Connected {
                connection_id: connection_id.to_string(),
                user_id: identity.user_id.as_str().to_string(),
                display_name: identity.display_name.clone(),
            },
            Notification::JoinError { message } => Self::JoinError {
                message: message.clone(),
            },
            Notification::CreateError { message } => Self::CreateError {
                message: message.clone(),
            },
            Notification::RoomCreated { room_id, username } => Self::RoomCreated {
                room: room_id.value(),
                username: username.as_str().to_string(),
            },
            Notification::UserList(roster) => Self::UpdateUserList {
                users: roster.iter().map(dto::UserInfo::from).collect(),
            },
            Notification::Message(message) => Self::ReceiveMessage {
                author: message.author.clone(),
                message: message.message.clone(),
                time: message.time.clone(),
            },
            Notification::LoadMessages(messages) => Self::LoadMessages {
                messages: messages.iter().map(dto::MessageInfo::from).collect(),
            },
            Notification::Kicked { room_id, reason } => Self::Kicked {
                room: room_id.value(),
                reason: reason.clone(),
            },
            Notification::RoomEnded { room_id } => Self::RoomEnded {
                room: room_id.value(),
            },
        }
    }
}

impl From<&RoomView> for http::RoomSummaryDto {
    fn from(view: &RoomView) -> Self {
        Self {
            id: view.room.id.value(),
            title: view.room.title.as_ref().map(|t| t.as_str().to_string()),
            participants: view
                .roster
                .iter()
                .map(|entry| entry.username.as_str().to_string())
                .collect(),
            locked: view.room.is_locked(),
            created_at: timestamp_to_jst_rfc3339(view.room.created_at.value()),
        }
    }
}

impl From<&RoomView> for http::RoomDetailDto {
    fn from(view: &RoomView) -> Self {
        Self {
            id: view.room.id.value(),
            title: view.room.title.as_ref().map(|t| t.as_str().to_string()),
            participants: view
                .roster
                .iter()
                .map(|entry| http::ParticipantDetailDto {
                    id: entry.connection_id.to_string(),
                    username: entry.username.as_str().to_string(),
                    is_admin: entry.is_admin,
                })
                .collect(),
            locked: view.room.is_locked(),
            created_at: timestamp_to_jst_rfc3339(view.room.created_at.value()),
        }
    }
}

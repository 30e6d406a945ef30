//! Domain error types.
//!
//! `RoomError` carries the user-facing text sent back in `join_error` /
//! `create_error` notifications, so its messages are written for people.

use thiserror::Error;

use super::value_object::RoomId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Room id must be a positive integer (got {0})")]
    InvalidRoomId(i64),

    #[error("Room id '{0}' is not an integer")]
    MalformedRoomId(String),

    #[error("Connection id '{0}' is not valid")]
    InvalidConnectionId(String),

    #[error("User id must not be empty")]
    EmptyUserId,

    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Username must be at most {0} characters")]
    UsernameTooLong(usize),

    #[error("Room title must be at most {0} characters")]
    TitleTooLong(usize),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Message must be at most {0} characters")]
    MessageTooLong(usize),
}

/// Room Directory errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("Room {0} already exists")]
    AlreadyExists(RoomId),

    #[error("Room {room_id} is outside 1..={max_room_id}")]
    InvalidId { room_id: RoomId, max_room_id: u32 },

    #[error("Directory already holds {0} rooms")]
    DirectoryFull(usize),
}

/// Membership Table errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("Room is full ({0} members)")]
    RoomFull(usize),

    #[error("Username '{0}' is already taken in this room")]
    DuplicateUsername(String),

    #[error("Connection is already a member of room {0}")]
    AlreadyInRoom(RoomId),
}

/// Rejection of a `create_room` / `join_room` event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Invalid room. Room must be an integer between 1 and {max_room_id}.")]
    InvalidRoom { max_room_id: u32 },

    #[error("Room already exists.")]
    RoomExists,

    #[error("Room limit reached. Cannot create new rooms right now.")]
    DirectoryFull,

    #[error("A room password is required to create a room.")]
    SecretRequired,

    #[error("Room does not exist.")]
    RoomNotFound,

    #[error("Incorrect room password.")]
    BadSecret,

    #[error("Username already exists in the room.")]
    DuplicateUsername,

    #[error("Room is full (max {max_members} participants).")]
    RoomFull { max_members: usize },

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid room title: {0}")]
    InvalidTitle(String),

    #[error("You are already in room {0}. Leave it first.")]
    AlreadyInRoom(RoomId),
}

impl From<DirectoryError> for RoomError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::AlreadyExists(_) => RoomError::RoomExists,
            DirectoryError::InvalidId { max_room_id, .. } => RoomError::InvalidRoom { max_room_id },
            DirectoryError::DirectoryFull(_) => RoomError::DirectoryFull,
        }
    }
}

impl From<MembershipError> for RoomError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::RoomFull(max_members) => RoomError::RoomFull { max_members },
            MembershipError::DuplicateUsername(_) => RoomError::DuplicateUsername,
            MembershipError::AlreadyInRoom(room_id) => RoomError::AlreadyInRoom(room_id),
        }
    }
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// History store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("History store unavailable: {0}")]
    Unavailable(String),
}

/// Identity verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("No credential presented")]
    MissingCredential,

    #[error("Credential rejected")]
    Unauthenticated,
}

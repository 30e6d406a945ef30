//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: u32,
    pub title: Option<String>,
    /// Usernames in join order
    pub participants: Vec<String>,
    pub locked: bool,
    /// RFC 3339 (JST)
    pub created_at: String,
}

/// Body of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: u32,
    pub title: Option<String>,
    pub participants: Vec<ParticipantDetailDto>,
    pub locked: bool,
    /// RFC 3339 (JST)
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

//! Room limits and access policy.

/// Bounds and access rules applied by the registry.
///
/// The defaults are the stricter configuration: 50 room ids, at most 50 live
/// rooms and 25 members per room, and every new room must carry a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPolicy {
    /// Highest accepted room id (ids start at 1)
    pub max_room_id: u32,
    /// Maximum number of rooms alive at the same time
    pub max_rooms: usize,
    /// Maximum number of members in one room
    pub max_members: usize,
    /// Whether `create_room` must supply a non-empty secret
    pub require_secret: bool,
}

impl RoomPolicy {
    pub const DEFAULT_MAX_ROOM_ID: u32 = 50;
    pub const DEFAULT_MAX_ROOMS: usize = 50;
    pub const DEFAULT_MAX_MEMBERS: usize = 25;
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            max_room_id: Self::DEFAULT_MAX_ROOM_ID,
            max_rooms: Self::DEFAULT_MAX_ROOMS,
            max_members: Self::DEFAULT_MAX_MEMBERS,
            require_secret: true,
        }
    }
}

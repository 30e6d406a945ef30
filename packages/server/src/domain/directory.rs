//! Room Directory: room id → room metadata.
//!
//! Only mutates its own map. Notifications are the use cases' job.

use std::collections::HashMap;

use super::{
    entity::Room,
    error::DirectoryError,
    policy::RoomPolicy,
    value_object::{ConnectionId, RoomId, RoomSecret, RoomTitle, Timestamp, UserId},
};

/// Everything needed to register a room.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub id: RoomId,
    pub title: Option<RoomTitle>,
    pub access_secret: Option<RoomSecret>,
    pub creator: ConnectionId,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Room>,
    max_room_id: u32,
    max_rooms: usize,
}

impl RoomDirectory {
    pub fn new(policy: &RoomPolicy) -> Self {
        Self {
            rooms: HashMap::new(),
            max_room_id: policy.max_room_id,
            max_rooms: policy.max_rooms,
        }
    }

    /// Range check only.
    pub fn check_id(&self, id: RoomId) -> Result<(), DirectoryError> {
        if id.value() > self.max_room_id {
            return Err(DirectoryError::InvalidId {
                room_id: id,
                max_room_id: self.max_room_id,
            });
        }
        Ok(())
    }

    /// Every check `create` performs, without mutating.
    pub fn check_create(&self, id: RoomId) -> Result<(), DirectoryError> {
        self.check_id(id)?;
        if self.rooms.contains_key(&id) {
            return Err(DirectoryError::AlreadyExists(id));
        }
        if self.rooms.len() >= self.max_rooms {
            return Err(DirectoryError::DirectoryFull(self.max_rooms));
        }
        Ok(())
    }

    pub fn create(&mut self, new_room: NewRoom) -> Result<&Room, DirectoryError> {
        self.check_create(new_room.id)?;

        let room = Room {
            id: new_room.id,
            title: new_room.title,
            access_secret: new_room.access_secret,
            admin: new_room.creator,
            created_by: new_room.created_by,
            created_at: new_room.created_at,
        };
        Ok(self.rooms.entry(new_room.id).or_insert(room))
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    pub fn remove(&mut self, id: RoomId) -> Option<Room> {
        self.rooms.remove(&id)
    }

    /// Returns `false` when the room does not exist.
    pub fn set_admin(&mut self, id: RoomId, connection_id: ConnectionId) -> bool {
        match self.rooms.get_mut(&id) {
            Some(room) => {
                room.admin = connection_id;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Room ids in ascending order
    pub fn ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().copied().collect();
        ids.sort();
        ids
    }
}

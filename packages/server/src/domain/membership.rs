//! Membership Table: room id → ordered list of current members.
//!
//! A connection is a member of at most one room. The reverse index
//! (`locations`) makes connection-lost cleanup O(1) and is kept in sync with
//! the per-room lists on every mutation.

use std::collections::HashMap;

use super::{
    entity::{Member, RosterEntry},
    error::MembershipError,
    policy::RoomPolicy,
    value_object::{ConnectionId, RoomId},
};

#[derive(Debug)]
pub struct MembershipTable {
    entries: HashMap<RoomId, Vec<Member>>,
    locations: HashMap<ConnectionId, RoomId>,
    max_members: usize,
}

impl MembershipTable {
    pub fn new(policy: &RoomPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            locations: HashMap::new(),
            max_members: policy.max_members,
        }
    }

    /// Every check `add` performs, without mutating.
    pub fn check_add(&self, room_id: RoomId, member: &Member) -> Result<(), MembershipError> {
        if let Some(current) = self.locations.get(&member.connection_id) {
            return Err(MembershipError::AlreadyInRoom(*current));
        }

        let members = self.members(room_id);
        if members
            .iter()
            .any(|m| m.username.collides_with(&member.username))
        {
            return Err(MembershipError::DuplicateUsername(
                member.username.as_str().to_string(),
            ));
        }
        if members.len() >= self.max_members {
            return Err(MembershipError::RoomFull(self.max_members));
        }
        Ok(())
    }

    pub fn add(&mut self, room_id: RoomId, member: Member) -> Result<(), MembershipError> {
        self.check_add(room_id, &member)?;

        self.locations.insert(member.connection_id, room_id);
        self.entries.entry(room_id).or_default().push(member);
        Ok(())
    }

    /// Remove a connection from a room.
    ///
    /// Returns `None` when the connection is not a member of that room, so
    /// repeated calls for the same departure are harmless.
    pub fn remove(&mut self, room_id: RoomId, connection_id: &ConnectionId) -> Option<Member> {
        if self.locations.get(connection_id) != Some(&room_id) {
            return None;
        }

        let members = self.entries.get_mut(&room_id)?;
        let index = members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        let removed = members.remove(index);
        if members.is_empty() {
            self.entries.remove(&room_id);
        }
        self.locations.remove(connection_id);
        Some(removed)
    }

    /// Drop every member of a room at once.
    pub fn clear(&mut self, room_id: RoomId) -> Vec<Member> {
        let members = self.entries.remove(&room_id).unwrap_or_default();
        for member in &members {
            self.locations.remove(&member.connection_id);
        }
        members
    }

    /// Current members in join order
    pub fn members(&self, room_id: RoomId) -> &[Member] {
        self.entries.get(&room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn member(&self, room_id: RoomId, connection_id: &ConnectionId) -> Option<&Member> {
        self.members(room_id)
            .iter()
            .find(|m| &m.connection_id == connection_id)
    }

    pub fn list_annotated(&self, room_id: RoomId, admin: &ConnectionId) -> Vec<RosterEntry> {
        self.members(room_id)
            .iter()
            .map(|m| RosterEntry {
                connection_id: m.connection_id,
                username: m.username.clone(),
                is_admin: &m.connection_id == admin,
            })
            .collect()
    }

    pub fn is_empty(&self, room_id: RoomId) -> bool {
        self.members(room_id).is_empty()
    }

    pub fn len(&self, room_id: RoomId) -> usize {
        self.members(room_id).len()
    }

    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.locations.get(connection_id).copied()
    }
}

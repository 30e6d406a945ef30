//! Room registry aggregate.
//!
//! Owns the Room Directory, the Membership Table and the admin election
//! policy, and applies each protocol event as one all-or-nothing step: every
//! validation runs before the first mutation, so a rejected event leaves both
//! tables untouched.
//!
//! Invariants kept after every public method returns:
//! - a room is in the directory iff its membership list is non-empty;
//! - a room's admin is one of its current members;
//! - usernames in a room are unique ignoring case;
//! - a connection is in at most one room.

use super::{
    directory::{NewRoom, RoomDirectory},
    election::{AdminElection, elect_admin},
    entity::{Member, Room, RosterEntry},
    error::RoomError,
    membership::MembershipTable,
    policy::RoomPolicy,
    value_object::{ConnectionId, RoomId, RoomSecret, RoomTitle, Timestamp, UserId, Username},
};

/// `create_room` request
#[derive(Debug, Clone)]
pub struct CreateRoom {
    pub room_id: RoomId,
    pub title: Option<RoomTitle>,
    pub secret: Option<RoomSecret>,
    pub username: Username,
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

/// `join_room` request
#[derive(Debug, Clone)]
pub struct JoinRoom {
    pub room_id: RoomId,
    pub secret: Option<RoomSecret>,
    pub username: Username,
    pub connection_id: ConnectionId,
    pub user_id: UserId,
}

/// Post-mutation state of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub room: Room,
    pub roster: Vec<RosterEntry>,
}

impl RoomView {
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.roster.iter().map(|entry| entry.connection_id).collect()
    }

    /// Members other than `connection_id`
    pub fn member_ids_except(&self, connection_id: &ConnectionId) -> Vec<ConnectionId> {
        self.roster
            .iter()
            .map(|entry| entry.connection_id)
            .filter(|id| id != connection_id)
            .collect()
    }

    pub fn admin_entry(&self) -> Option<&RosterEntry> {
        self.roster.iter().find(|entry| entry.is_admin)
    }
}

/// Outcome of a leave or a lost connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// The connection was not in that room; nothing changed.
    NotMember,
    /// The member left and the room lives on.
    Left {
        room_id: RoomId,
        member: Member,
        new_admin: Option<Member>,
        view: RoomView,
    },
    /// The member was the last one; the room has been torn down.
    Closed { room_id: RoomId, member: Member },
}

/// Outcome of an accepted `remove_user`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub room_id: RoomId,
    pub removed: Member,
    pub view: RoomView,
}

/// Outcome of an accepted `make_admin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminTransfer {
    pub room_id: RoomId,
    pub new_admin: Member,
    pub view: RoomView,
}

/// Outcome of an accepted `end_room`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndedRoom {
    pub room: Room,
    pub members: Vec<Member>,
}

pub struct RoomRegistry {
    policy: RoomPolicy,
    directory: RoomDirectory,
    membership: MembershipTable,
    election: Box<dyn AdminElection>,
}

impl RoomRegistry {
    pub fn new(policy: RoomPolicy, election: Box<dyn AdminElection>) -> Self {
        Self {
            policy,
            directory: RoomDirectory::new(&policy),
            membership: MembershipTable::new(&policy),
            election,
        }
    }

    /// Create a room with the requester as its first member and admin.
    pub fn create_room(&mut self, request: CreateRoom) -> Result<RoomView, RoomError> {
        let room_id = request.room_id;
        let creator = Member::new(request.connection_id, request.username, request.user_id);

        self.directory.check_create(room_id)?;
        if self.policy.require_secret && request.secret.is_none() {
            return Err(RoomError::SecretRequired);
        }
        self.membership.check_add(room_id, &creator)?;

        self.directory.create(NewRoom {
            id: room_id,
            title: request.title,
            access_secret: request.secret,
            creator: creator.connection_id,
            created_by: creator.user_id.clone(),
            created_at: request.created_at,
        })?;
        if let Err(err) = self.membership.add(room_id, creator) {
            self.directory.remove(room_id);
            return Err(err.into());
        }

        self.view(room_id).ok_or(RoomError::RoomNotFound)
    }

    /// Add the requester to an existing room.
    pub fn join_room(&mut self, request: JoinRoom) -> Result<RoomView, RoomError> {
        let room_id = request.room_id;

        self.directory.check_id(room_id)?;
        let room = self.directory.get(room_id).ok_or(RoomError::RoomNotFound)?;
        if !room.admits(request.secret.as_ref()) {
            return Err(RoomError::BadSecret);
        }

        let member = Member::new(request.connection_id, request.username, request.user_id);
        self.membership.add(room_id, member)?;

        self.view(room_id).ok_or(RoomError::RoomNotFound)
    }

    /// Remove a connection from a room, re-electing the admin or tearing the
    /// room down as needed. Idempotent.
    pub fn depart(&mut self, room_id: RoomId, connection_id: &ConnectionId) -> Departure {
        let Some(member) = self.membership.remove(room_id, connection_id) else {
            return Departure::NotMember;
        };

        if self.membership.is_empty(room_id) {
            self.directory.remove(room_id);
            return Departure::Closed { room_id, member };
        }

        let was_admin = self
            .directory
            .get(room_id)
            .is_some_and(|room| room.is_admin(connection_id));
        let new_admin = elect_admin(
            self.election.as_mut(),
            was_admin,
            self.membership.members(room_id),
        );
        if let Some(admin) = &new_admin {
            self.directory.set_admin(room_id, admin.connection_id);
        }

        match self.view(room_id) {
            Some(view) => Departure::Left {
                room_id,
                member,
                new_admin,
                view,
            },
            // Members without a directory entry: drop them so nothing leaks.
            None => {
                self.membership.clear(room_id);
                Departure::Closed { room_id, member }
            }
        }
    }

    /// Admin removes another member. `None` when not authorized or the
    /// target is not a member.
    pub fn remove_member(
        &mut self,
        room_id: RoomId,
        caller: &ConnectionId,
        target: &ConnectionId,
    ) -> Option<Removal> {
        if caller == target || !self.is_admin(room_id, caller) {
            return None;
        }
        let removed = self.membership.remove(room_id, target)?;
        let view = self.view(room_id)?;
        Some(Removal {
            room_id,
            removed,
            view,
        })
    }

    /// Admin hands the role to another member.
    pub fn make_admin(
        &mut self,
        room_id: RoomId,
        caller: &ConnectionId,
        target: &ConnectionId,
    ) -> Option<AdminTransfer> {
        if caller == target || !self.is_admin(room_id, caller) {
            return None;
        }
        let new_admin = self.membership.member(room_id, target)?.clone();
        self.directory.set_admin(room_id, new_admin.connection_id);
        let view = self.view(room_id)?;
        Some(AdminTransfer {
            room_id,
            new_admin,
            view,
        })
    }

    /// Admin terminates the room.
    pub fn end_room(&mut self, room_id: RoomId, caller: &ConnectionId) -> Option<EndedRoom> {
        if !self.is_admin(room_id, caller) {
            return None;
        }
        let room = self.directory.remove(room_id)?;
        let members = self.membership.clear(room_id);
        Some(EndedRoom { room, members })
    }

    /// The member record, only if the room exists and the connection is in it.
    pub fn member(&self, room_id: RoomId, connection_id: &ConnectionId) -> Option<Member> {
        if !self.directory.contains(room_id) {
            return None;
        }
        self.membership.member(room_id, connection_id).cloned()
    }

    pub fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        self.membership.room_of(connection_id).into_iter().collect()
    }

    pub fn snapshot(&self, room_id: RoomId) -> Option<RoomView> {
        self.view(room_id)
    }

    /// All live rooms in ascending id order
    pub fn list(&self) -> Vec<RoomView> {
        self.directory
            .ids()
            .into_iter()
            .filter_map(|room_id| self.view(room_id))
            .collect()
    }

    #[cfg(test)]
    pub fn room_count(&self) -> usize {
        self.directory.len()
    }

    fn is_admin(&self, room_id: RoomId, connection_id: &ConnectionId) -> bool {
        self.directory
            .get(room_id)
            .is_some_and(|room| room.is_admin(connection_id))
    }

    fn view(&self, room_id: RoomId) -> Option<RoomView> {
        let room = self.directory.get(room_id)?;
        Some(RoomView {
            room: room.clone(),
            roster: self.membership.list_annotated(room_id, &room.admin),
        })
    }

    /// Check the aggregate invariants, returning a description of the first
    /// violation.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        for room_id in self.directory.ids() {
            let Some(room) = self.directory.get(room_id) else {
                continue;
            };
            let members = self.membership.members(room_id);
            if members.is_empty() {
                return Err(format!("room {} exists without members", room_id));
            }
            if !members.iter().any(|m| m.connection_id == room.admin) {
                return Err(format!("admin of room {} is not a member", room_id));
            }
            if members.len() > self.policy.max_members {
                return Err(format!("room {} exceeds capacity", room_id));
            }
            let mut keys: Vec<String> = members.iter().map(|m| m.username.key()).collect();
            keys.sort();
            keys.dedup();
            if keys.len() != members.len() {
                return Err(format!("room {} has duplicate usernames", room_id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::election::{FirstMemberElection, RandomElection};

    struct Client {
        connection_id: ConnectionId,
        username: Username,
        user_id: UserId,
    }

    fn client(name: &str) -> Client {
        Client {
            connection_id: ConnectionId::generate(),
            username: Username::new(name.to_string()).unwrap(),
            user_id: UserId::new(format!("uid-{}", name)).unwrap(),
        }
    }

    fn room(id: i64) -> RoomId {
        RoomId::new(id).unwrap()
    }

    fn secret(raw: &str) -> Option<RoomSecret> {
        RoomSecret::parse(Some(raw))
    }

    fn registry() -> RoomRegistry {
        RoomRegistry::new(RoomPolicy::default(), Box::new(FirstMemberElection))
    }

    fn create(registry: &mut RoomRegistry, id: i64, who: &Client) -> Result<RoomView, RoomError> {
        registry.create_room(CreateRoom {
            room_id: room(id),
            title: None,
            secret: secret("abc"),
            username: who.username.clone(),
            connection_id: who.connection_id,
            user_id: who.user_id.clone(),
            created_at: Timestamp::new(0),
        })
    }

    fn join(
        registry: &mut RoomRegistry,
        id: i64,
        who: &Client,
        with_secret: &str,
    ) -> Result<RoomView, RoomError> {
        registry.join_room(JoinRoom {
            room_id: room(id),
            secret: secret(with_secret),
            username: who.username.clone(),
            connection_id: who.connection_id,
            user_id: who.user_id.clone(),
        })
    }

    #[test]
    fn test_create_room_makes_creator_admin() {
        // テスト項目: ルーム作成者が最初のメンバーかつ管理者になる
        // given (前提条件):
        let mut registry = registry();
        let alice = client("alice");

        // when (操作):
        let view = create(&mut registry, 7, &alice).unwrap();

        // then (期待する結果):
        assert_eq!(view.room.admin, alice.connection_id);
        assert_eq!(view.roster.len(), 1);
        assert!(view.roster[0].is_admin);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_create_room_requires_secret_when_policy_active() {
        // テスト項目: シークレット必須のポリシーではシークレットなしで作成できない
        let mut registry = registry();
        let alice = client("alice");

        let result = registry.create_room(CreateRoom {
            room_id: room(3),
            title: None,
            secret: None,
            username: alice.username.clone(),
            connection_id: alice.connection_id,
            user_id: alice.user_id.clone(),
            created_at: Timestamp::new(0),
        });

        assert_eq!(result, Err(RoomError::SecretRequired));
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn test_open_rooms_allowed_when_policy_inactive() {
        // テスト項目: シークレット不要のポリシーではシークレットなしで作成・参加できる
        let mut registry = RoomRegistry::new(
            RoomPolicy {
                require_secret: false,
                ..RoomPolicy::default()
            },
            Box::new(FirstMemberElection),
        );
        let alice = client("alice");
        let bob = client("bob");

        registry
            .create_room(CreateRoom {
                room_id: room(3),
                title: None,
                secret: None,
                username: alice.username.clone(),
                connection_id: alice.connection_id,
                user_id: alice.user_id.clone(),
                created_at: Timestamp::new(0),
            })
            .unwrap();
        let view = join(&mut registry, 3, &bob, "anything").unwrap();

        assert_eq!(view.roster.len(), 2);
    }

    #[test]
    fn test_create_existing_room_fails_without_side_effects() {
        // テスト項目: 既存ルームの作成は失敗し、作成者は別のルームに参加できる状態のまま
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        create(&mut registry, 7, &alice).unwrap();

        assert_eq!(create(&mut registry, 7, &bob), Err(RoomError::RoomExists));
        assert!(registry.rooms_of(&bob.connection_id).is_empty());
        assert!(create(&mut registry, 8, &bob).is_ok());
    }

    #[test]
    fn test_create_room_while_in_another_room_fails() {
        // テスト項目: 既に別のルームにいる接続は新しいルームを作れず、ルームも残らない
        let mut registry = registry();
        let alice = client("alice");
        create(&mut registry, 1, &alice).unwrap();

        let result = create(&mut registry, 2, &alice);

        assert_eq!(result, Err(RoomError::AlreadyInRoom(room(1))));
        assert!(registry.snapshot(room(2)).is_none());
    }

    #[test]
    fn test_join_room_scenarios() {
        // テスト項目: 参加時の各種検証（範囲外・存在しない・シークレット違い・重複）
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        let impostor = client("ALICE");
        create(&mut registry, 7, &alice).unwrap();

        assert_eq!(
            join(&mut registry, 51, &bob, "abc"),
            Err(RoomError::InvalidRoom { max_room_id: 50 })
        );
        assert_eq!(
            join(&mut registry, 9, &bob, "abc"),
            Err(RoomError::RoomNotFound)
        );
        assert_eq!(
            join(&mut registry, 7, &bob, "wrong"),
            Err(RoomError::BadSecret)
        );
        assert_eq!(
            join(&mut registry, 7, &impostor, "abc"),
            Err(RoomError::DuplicateUsername)
        );
        assert_eq!(registry.snapshot(room(7)).unwrap().roster.len(), 1);

        let view = join(&mut registry, 7, &bob, "abc").unwrap();
        assert_eq!(view.roster.len(), 2);
        assert!(view.roster[0].is_admin);
        assert!(!view.roster[1].is_admin);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_join_full_room_is_rejected() {
        // テスト項目: 定員を超える参加は拒否され、メンバーは変化しない
        let mut registry = RoomRegistry::new(
            RoomPolicy {
                max_members: 2,
                ..RoomPolicy::default()
            },
            Box::new(FirstMemberElection),
        );
        let alice = client("alice");
        create(&mut registry, 1, &alice).unwrap();
        join(&mut registry, 1, &client("bob"), "abc").unwrap();

        let result = join(&mut registry, 1, &client("carol"), "abc");

        assert_eq!(result, Err(RoomError::RoomFull { max_members: 2 }));
        assert_eq!(registry.snapshot(room(1)).unwrap().roster.len(), 2);
    }

    #[test]
    fn test_admin_departure_elects_new_admin() {
        // テスト項目: 管理者が退出すると残りのメンバーから 1 人だけ管理者が選ばれる
        // given (前提条件):
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        let carol = client("carol");
        create(&mut registry, 1, &alice).unwrap();
        join(&mut registry, 1, &bob, "abc").unwrap();
        join(&mut registry, 1, &carol, "abc").unwrap();

        // when (操作):
        let departure = registry.depart(room(1), &alice.connection_id);

        // then (期待する結果):
        let Departure::Left {
            new_admin, view, ..
        } = departure
        else {
            panic!("expected the room to stay open");
        };
        assert_eq!(new_admin.unwrap().connection_id, bob.connection_id);
        assert_eq!(view.room.admin, bob.connection_id);
        assert_eq!(view.roster.iter().filter(|e| e.is_admin).count(), 1);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_non_admin_departure_keeps_admin() {
        // テスト項目: 管理者以外が退出しても管理者は変わらない
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        create(&mut registry, 1, &alice).unwrap();
        join(&mut registry, 1, &bob, "abc").unwrap();

        let departure = registry.depart(room(1), &bob.connection_id);

        assert!(matches!(
            departure,
            Departure::Left {
                new_admin: None,
                ..
            }
        ));
        assert_eq!(
            registry.snapshot(room(1)).unwrap().room.admin,
            alice.connection_id
        );
    }

    #[test]
    fn test_last_departure_closes_room() {
        // テスト項目: 最後のメンバーが退出するとルームが削除される
        let mut registry = registry();
        let alice = client("alice");
        create(&mut registry, 1, &alice).unwrap();

        let departure = registry.depart(room(1), &alice.connection_id);

        assert!(matches!(departure, Departure::Closed { .. }));
        assert!(registry.snapshot(room(1)).is_none());
        assert_eq!(registry.room_count(), 0);
        assert_eq!(
            join(&mut registry, 1, &client("bob"), "abc"),
            Err(RoomError::RoomNotFound)
        );
    }

    #[test]
    fn test_double_departure_is_noop() {
        // テスト項目: 同じ接続の退出を 2 回行っても 2 回目は何もしない
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        create(&mut registry, 1, &alice).unwrap();
        join(&mut registry, 1, &bob, "abc").unwrap();

        let first = registry.depart(room(1), &bob.connection_id);
        let second = registry.depart(room(1), &bob.connection_id);
        let third = registry.rooms_of(&bob.connection_id);

        assert!(matches!(first, Departure::Left { .. }));
        assert_eq!(second, Departure::NotMember);
        assert!(third.is_empty());
        assert_eq!(registry.snapshot(room(1)).unwrap().roster.len(), 1);
    }

    #[test]
    fn test_remove_member_requires_admin() {
        // テスト項目: 管理者以外によるメンバー削除は無視される
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        let carol = client("carol");
        create(&mut registry, 1, &alice).unwrap();
        join(&mut registry, 1, &bob, "abc").unwrap();
        join(&mut registry, 1, &carol, "abc").unwrap();

        assert!(
            registry
                .remove_member(room(1), &bob.connection_id, &carol.connection_id)
                .is_none()
        );
        assert!(
            registry
                .remove_member(room(1), &alice.connection_id, &alice.connection_id)
                .is_none()
        );

        let removal = registry
            .remove_member(room(1), &alice.connection_id, &carol.connection_id)
            .unwrap();
        assert_eq!(removal.removed.connection_id, carol.connection_id);
        assert_eq!(removal.view.roster.len(), 2);
        assert!(
            registry
                .remove_member(room(1), &alice.connection_id, &carol.connection_id)
                .is_none()
        );
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_make_admin_transfers_role() {
        // テスト項目: 管理者は他のメンバーに管理者権限を移譲できる
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        create(&mut registry, 1, &alice).unwrap();
        join(&mut registry, 1, &bob, "abc").unwrap();

        assert!(
            registry
                .make_admin(room(1), &bob.connection_id, &bob.connection_id)
                .is_none()
        );
        let transfer = registry
            .make_admin(room(1), &alice.connection_id, &bob.connection_id)
            .unwrap();

        assert_eq!(transfer.view.room.admin, bob.connection_id);
        assert!(
            registry
                .make_admin(room(1), &alice.connection_id, &bob.connection_id)
                .is_none()
        );
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_make_admin_for_non_member_is_noop() {
        // テスト項目: メンバーでない接続への移譲は無視される
        let mut registry = registry();
        let alice = client("alice");
        create(&mut registry, 1, &alice).unwrap();

        let stranger = ConnectionId::generate();

        assert!(
            registry
                .make_admin(room(1), &alice.connection_id, &stranger)
                .is_none()
        );
        assert_eq!(
            registry.snapshot(room(1)).unwrap().room.admin,
            alice.connection_id
        );
    }

    #[test]
    fn test_end_room_by_admin_only() {
        // テスト項目: ルームの終了は管理者のみ可能で、全員が解放される
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        create(&mut registry, 1, &alice).unwrap();
        join(&mut registry, 1, &bob, "abc").unwrap();

        assert!(registry.end_room(room(1), &bob.connection_id).is_none());

        let ended = registry.end_room(room(1), &alice.connection_id).unwrap();

        assert_eq!(ended.members.len(), 2);
        assert!(registry.snapshot(room(1)).is_none());
        assert!(registry.rooms_of(&bob.connection_id).is_empty());
        assert!(create(&mut registry, 1, &bob).is_ok());
    }

    #[test]
    fn test_member_lookup_requires_membership() {
        // テスト項目: メンバー検索はルームに所属している場合のみ成功する
        let mut registry = registry();
        let alice = client("alice");
        let bob = client("bob");
        create(&mut registry, 1, &alice).unwrap();

        assert!(registry.member(room(1), &alice.connection_id).is_some());
        assert!(registry.member(room(1), &bob.connection_id).is_none());
        assert!(registry.member(room(2), &alice.connection_id).is_none());
    }

    #[test]
    fn test_invariants_hold_under_random_churn() {
        // テスト項目: ランダムな参加・退出を繰り返しても不変条件が保たれる
        let mut registry = RoomRegistry::new(
            RoomPolicy {
                max_members: 4,
                ..RoomPolicy::default()
            },
            Box::new(RandomElection::seeded(3)),
        );
        let clients: Vec<Client> = (0..12).map(|i| client(&format!("user{}", i % 6))).collect();

        for step in 0..300usize {
            let who = &clients[(step * 7) % clients.len()];
            let room_no = (step % 3) as i64 + 1;
            match step % 4 {
                0 => {
                    let _ = create(&mut registry, room_no, who);
                }
                1 | 2 => {
                    let _ = join(&mut registry, room_no, who, "abc");
                }
                _ => {
                    for room_id in registry.rooms_of(&who.connection_id) {
                        let _ = registry.depart(room_id, &who.connection_id);
                    }
                }
            }
            registry.check_invariants().unwrap();
        }
    }
}

//! ドメイン層
//!
//! Room / Member の値オブジェクトとエンティティ、ルーム登録簿（Directory）、
//! メンバー表（Membership）、管理者選出ポリシー、およびそれらを束ねる
//! `RoomRegistry` 集約を定義します。外部協調者（通知・履歴・認証）は
//! trait としてここで定義し、Infrastructure 層が実装します（依存性の逆転）。

pub mod directory;
pub mod election;
pub mod entity;
pub mod error;
pub mod history;
pub mod identity;
pub mod membership;
pub mod message_pusher;
pub mod policy;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use directory::{NewRoom, RoomDirectory};
pub use election::{AdminElection, FirstMemberElection, RandomElection, elect_admin};
pub use entity::{ChatMessage, Identity, Member, Room, RosterEntry};
pub use error::{
    DirectoryError, HistoryError, IdentityError, MembershipError, MessagePushError, RoomError,
    ValueObjectError,
};
pub use history::HistoryStore;
pub use identity::IdentityProvider;
pub use membership::MembershipTable;
pub use message_pusher::{MessagePusher, Notification, PusherChannel};
pub use policy::RoomPolicy;
pub use registry::{
    AdminTransfer, CreateRoom, Departure, EndedRoom, JoinRoom, Removal, RoomRegistry, RoomView,
};
pub use repository::{RoomRepository, RoomTurn};
pub use value_object::{
    ConnectionId, MessageContent, RoomId, RoomSecret, RoomTitle, Timestamp, UserId, Username,
};

#[cfg(test)]
pub use history::MockHistoryStore;
#[cfg(test)]
pub use identity::MockIdentityProvider;

//! 値オブジェクト
//!
//! 生の入力（JSON の数値・文字列）をドメインで扱える型に変換し、
//! 変換時に不変条件を検証します。

use std::fmt;

use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Room identifier: a positive integer.
///
/// The upper bound is a policy decision and is checked by the directory,
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(u32);

impl RoomId {
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .map(Self)
            .ok_or(ValueObjectError::InvalidRoomId(value))
    }

    /// Parse a room id sent as text (`"7"`, `" 12 "`).
    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ValueObjectError::MalformedRoomId(raw.to_string()))?;
        Self::new(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-issued identifier of one WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ValueObjectError::InvalidConnectionId(raw.to_string()))
    }
}

impl From<Uuid> for ConnectionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyUserId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name of a member inside one room.
///
/// Surrounding whitespace is trimmed. Two usernames collide when their
/// lowercase forms are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub const MAX_LENGTH: usize = 32;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::UsernameTooLong(Self::MAX_LENGTH));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive uniqueness key
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn collides_with(&self, other: &Username) -> bool {
        self.key() == other.key()
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access secret of a room. Blank input means "no secret".
///
/// Surrounding whitespace is trimmed on both create and join, so `"abc "`
/// opens a room created with `"abc"`.
#[derive(Clone, PartialEq, Eq)]
pub struct RoomSecret(String);

impl RoomSecret {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
    }

    /// Constant-time comparison against a presented secret
    pub fn matches(&self, presented: &RoomSecret) -> bool {
        self.0.as_bytes().ct_eq(presented.0.as_bytes()).into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print secrets in logs.
impl fmt::Debug for RoomSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RoomSecret(***)")
    }
}

/// Optional human-readable room title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTitle(String);

impl RoomTitle {
    pub const MAX_LENGTH: usize = 64;

    /// Blank titles are treated as absent.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, ValueObjectError> {
        let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::TitleTooLong(Self::MAX_LENGTH));
        }
        Ok(Some(Self(trimmed.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub const MAX_LENGTH: usize = 2000;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::MessageTooLong(Self::MAX_LENGTH));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in milliseconds (JST clock)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

//! Core types shared by the credential, token and key-value layers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::PasswordDigest;

/// A registered user as returned to callers
///
/// Never carries the password or its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier assigned at registration
    #[serde(rename = "user_id")]
    pub id: Uuid,

    /// Unique login name (1 to 50 characters)
    pub username: String,

    /// Unique email address
    pub email: String,

    pub full_name: String,

    /// Always positive
    pub age: u32,

    /// Never empty
    pub gender: String,
}

/// A live or lapsed session attached to a user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,
    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is live strictly before its expiry instant
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Whole seconds left at `now`, floored at zero
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

/// Everything the store keeps about a user
///
/// The current session lives on the record itself so that re-issuing a
/// token is a single-record overwrite.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: PasswordDigest,
    pub session: Option<Session>,
}

impl UserRecord {
    /// Create a record for a freshly registered user with no session
    pub fn new(user: User, password_hash: PasswordDigest) -> Self {
        Self {
            user,
            password_hash,
            session: None,
        }
    }
}

/// Token handed to a caller after successful authentication
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Seconds until the token stops resolving
    pub expires_in: i64,
}

/// A stored key-value entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvEntry {
    /// Globally unique key
    pub key: String,

    /// Arbitrary text, may be empty
    pub value: String,

    /// The single user allowed to see or change this entry
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
}

impl KvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, owner_id: Uuid) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            owner_id,
        }
    }

    /// Ownership predicate shared by every read and mutation path
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_liveness_boundary() {
        let now = Utc::now();
        let session = Session {
            token: "t".into(),
            expires_at: now + Duration::seconds(3600),
        };

        assert!(session.is_live_at(now));
        assert!(session.is_live_at(now + Duration::seconds(3599)));
        assert!(!session.is_live_at(now + Duration::seconds(3600)));
        assert_eq!(session.seconds_remaining(now), 3600);
        assert_eq!(session.seconds_remaining(now + Duration::hours(2)), 0);
    }

    #[test]
    fn test_ownership_predicate() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let entry = KvEntry::new("k", "v", alice);

        assert!(entry.is_owned_by(alice));
        assert!(!entry.is_owned_by(bob));
    }

    #[test]
    fn test_entry_serialization_hides_owner() {
        let entry = KvEntry::new("color", "blue", Uuid::new_v4());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json, serde_json::json!({"key": "color", "value": "blue"}));
    }

    #[test]
    fn test_user_serializes_id_as_user_id() {
        let user = User {
            id: Uuid::nil(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: "Alice Liddell".into(),
            age: 30,
            gender: "female".into(),
        };
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("user_id").is_some());
        assert!(json.get("password").is_none());
    }
}

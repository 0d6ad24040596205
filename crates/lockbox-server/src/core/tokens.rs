//! Token authority: issues and resolves opaque session tokens
//!
//! Per-user state machine:
//!
//! ```text
//! NoSession --issue--> Active(t1, e1) --issue--> Active(t2, e2)
//!                           |
//!                       clock >= e1
//!                           v
//!                        Expired
//! ```
//!
//! Re-issue overwrites the session on the user record, so `t1` can never
//! resolve again. Expiry is checked lazily in [`TokenAuthority::resolve`].

use chrono::Duration;
use lockbox_core::{generate_token, IssuedToken, LockboxError, Result, Session, User};
use std::sync::Arc;
use tracing::{info, warn};

use super::clock::Clock;
use crate::storage::Store;

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

pub struct TokenAuthority {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    /// Issue a fresh token for `user`, replacing any previous one
    pub async fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = self.clock.now();
        let session = Session {
            token: generate_token(),
            expires_at: now + self.ttl,
        };
        let issued = IssuedToken {
            access_token: session.token.clone(),
            expires_in: session.seconds_remaining(now),
        };

        self.store.replace_session(user.id, session).await?;

        info!(user_id = %user.id, ttl_secs = issued.expires_in, "Issued access token");
        Ok(issued)
    }

    /// Resolve a presented token to its live owner
    ///
    /// Unknown, superseded and expired tokens all yield `INVALID_TOKEN`.
    pub async fn resolve(&self, token: &str) -> Result<User> {
        if token.is_empty() {
            return Err(LockboxError::InvalidToken);
        }

        let record = self
            .store
            .find_user_by_token(token)
            .await?
            .ok_or(LockboxError::InvalidToken)?;

        let now = self.clock.now();
        match &record.session {
            Some(session) if session.token == token && session.is_live_at(now) => Ok(record.user),
            Some(session) if session.token == token => {
                warn!(user_id = %record.user.id, expired_at = %session.expires_at, "Rejected expired token");
                Err(LockboxError::InvalidToken)
            }
            _ => Err(LockboxError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::storage::MemoryStore;
    use lockbox_core::{PasswordDigest, UserRecord};
    use uuid::Uuid;

    async fn setup() -> (TokenAuthority, Arc<ManualClock>, User) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: "Alice".into(),
            age: 30,
            gender: "female".into(),
        };
        store
            .insert_user(UserRecord::new(user.clone(), PasswordDigest::from_phc("x")))
            .await
            .unwrap();
        let authority = TokenAuthority::new(
            store,
            clock.clone(),
            Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        );
        (authority, clock, user)
    }

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let (authority, _, user) = setup().await;

        let issued = authority.issue(&user).await.unwrap();
        assert_eq!(issued.expires_in, 3600);
        assert!(issued.access_token.len() >= 32);

        let resolved = authority.resolve(&issued.access_token).await.unwrap();
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn test_reissue_invalidates_previous() {
        let (authority, _, user) = setup().await;

        let first = authority.issue(&user).await.unwrap();
        let second = authority.issue(&user).await.unwrap();
        assert_ne!(first.access_token, second.access_token);

        let err = authority.resolve(&first.access_token).await.unwrap_err();
        assert_eq!(err, LockboxError::InvalidToken);
        assert!(authority.resolve(&second.access_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let (authority, clock, user) = setup().await;
        let issued = authority.issue(&user).await.unwrap();

        clock.advance(Duration::seconds(3599));
        assert!(authority.resolve(&issued.access_token).await.is_ok());

        clock.advance(Duration::seconds(1));
        let err = authority.resolve(&issued.access_token).await.unwrap_err();
        assert_eq!(err, LockboxError::InvalidToken);
    }

    #[tokio::test]
    async fn test_reissue_after_expiry_revives_session() {
        let (authority, clock, user) = setup().await;
        let stale = authority.issue(&user).await.unwrap();

        clock.advance(Duration::hours(2));
        let fresh = authority.issue(&user).await.unwrap();

        assert!(authority.resolve(&stale.access_token).await.is_err());
        assert_eq!(authority.resolve(&fresh.access_token).await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_unknown_and_empty_tokens() {
        let (authority, _, _) = setup().await;

        assert_eq!(
            authority.resolve("no-such-token").await.unwrap_err(),
            LockboxError::InvalidToken
        );
        assert_eq!(authority.resolve("").await.unwrap_err(), LockboxError::InvalidToken);
    }

    #[tokio::test]
    async fn test_issue_for_unregistered_user_is_internal() {
        let (authority, _, mut user) = setup().await;
        user.id = Uuid::new_v4();

        let err = authority.issue(&user).await.unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}

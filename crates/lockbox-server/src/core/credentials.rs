//! Credential store: registration and password verification
//!
//! Registration checks run in a fixed order: shape, username uniqueness,
//! email uniqueness, then password/age/gender policy. Hashing happens only
//! after every check passes, on the blocking pool, and the plaintext is
//! zeroed as soon as the digest exists.
//!
//! Verification never reveals which half of a credential pair was wrong:
//! an unknown username still pays for one hash verification against a
//! decoy digest and fails with the same `INVALID_CREDENTIALS` code.

use lockbox_core::{
    LockboxError, PasswordDigest, PasswordHasher, RegistrationForm, Result, Secret, User,
    UserRecord,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::Store;

const DECOY_SECRET: &str = "lockbox-decoy-credential";

pub struct CredentialStore {
    store: Arc<dyn Store>,
    hasher: Arc<dyn PasswordHasher>,
    decoy: PasswordDigest,
}

impl CredentialStore {
    /// Build a credential store; hashes the decoy digest up front
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>) -> Result<Self> {
        let decoy = hasher.hash(DECOY_SECRET)?;
        Ok(Self {
            store,
            hasher,
            decoy,
        })
    }

    /// Register a new user
    pub async fn register(&self, form: RegistrationForm) -> Result<User> {
        let registration = form.well_formed()?;

        if self.store.username_exists(&registration.username).await? {
            warn!(username = %registration.username, "Registration rejected: username taken");
            return Err(LockboxError::UsernameExists);
        }
        if self.store.email_exists(&registration.email).await? {
            warn!(username = %registration.username, "Registration rejected: email taken");
            return Err(LockboxError::EmailExists);
        }

        let age = registration.check_policy()?;
        let password_hash = self.hash(registration.password).await?;

        let user = User {
            id: Uuid::new_v4(),
            username: registration.username,
            email: registration.email,
            full_name: registration.full_name,
            age,
            gender: registration.gender,
        };

        // A concurrent registration may have claimed the name or email since
        // the lookups above; the store's own uniqueness check decides.
        self.store
            .insert_user(UserRecord::new(user.clone(), password_hash))
            .await?;

        info!(user_id = %user.id, username = %user.username, "Registered user");
        Ok(user)
    }

    /// Check a username/password pair
    pub async fn verify(&self, username: &str, password: Secret) -> Result<User> {
        let record = self.store.find_user_by_username(username).await?;

        let (digest, user) = match record {
            Some(record) => (record.password_hash, Some(record.user)),
            None => (self.decoy.clone(), None),
        };

        let matches = self.check(password, digest).await?;

        match user {
            Some(user) if matches => Ok(user),
            _ => {
                warn!(username = %username, "Authentication failed");
                Err(LockboxError::InvalidCredentials)
            }
        }
    }

    async fn hash(&self, password: Secret) -> Result<PasswordDigest> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| LockboxError::Internal(format!("hashing task failed: {}", e)))?
    }

    async fn check(&self, password: Secret, digest: PasswordDigest) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(password.expose(), &digest))
            .await
            .map_err(|e| LockboxError::Internal(format!("verification task failed: {}", e)))
    }
}

//! Storage abstraction for Lockbox
//!
//! The store is the only shared mutable resource and the sole source of
//! truth: nothing above it caches users, sessions or entries between
//! requests. Every uniqueness guarantee (username, email, key) is enforced
//! here as an atomic check-and-insert, never by a separate lookup in the
//! caller.
//!
//! Two backends are provided:
//! - `MemoryStore` (default): single-process, lost on restart
//! - `PostgresStore` (`postgres` feature): shared by any number of instances

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use lockbox_core::{KvEntry, LockboxError, Session, UserRecord};
use std::fmt::Debug;
use uuid::Uuid;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Username already exists")]
    UsernameExists,

    #[error("Email already exists")]
    EmailExists,

    #[error("Key already exists: {0}")]
    KeyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<StorageError> for LockboxError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UsernameExists => LockboxError::UsernameExists,
            StorageError::EmailExists => LockboxError::EmailExists,
            StorageError::KeyExists(_) => LockboxError::KeyExists,
            other => LockboxError::Internal(other.to_string()),
        }
    }
}

/// Storage backend trait for Lockbox state
///
/// Implementations must be thread-safe and support concurrent access.
/// Each method is a single atomic operation against the backing store.
#[async_trait]
pub trait Store: Send + Sync + Debug {
    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user
    ///
    /// Fails with `UsernameExists` or `EmailExists` if either is taken,
    /// including when a concurrent insert claimed it first.
    async fn insert_user(&self, record: UserRecord) -> Result<(), StorageError>;

    async fn username_exists(&self, username: &str) -> Result<bool, StorageError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError>;

    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, StorageError>;

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Replace the user's current session in one write
    ///
    /// The previous token, if any, stops matching immediately.
    async fn replace_session(&self, user_id: Uuid, session: Session) -> Result<(), StorageError>;

    /// Find the user whose current session token equals `token`
    ///
    /// Expiry is not checked here.
    async fn find_user_by_token(&self, token: &str) -> Result<Option<UserRecord>, StorageError>;

    // =========================================================================
    // Key-value entries
    // =========================================================================

    /// Insert an entry unless its key exists for any user
    async fn insert_entry(&self, entry: KvEntry) -> Result<(), StorageError>;

    async fn get_entry(&self, key: &str) -> Result<Option<KvEntry>, StorageError>;

    /// Replace the value of an entry owned by `owner`
    ///
    /// Returns false if the key is absent or owned by someone else.
    async fn update_entry(&self, owner: Uuid, key: &str, value: &str)
        -> Result<bool, StorageError>;

    /// Remove an entry owned by `owner`
    ///
    /// Returns false if the key is absent or owned by someone else.
    async fn delete_entry(&self, owner: Uuid, key: &str) -> Result<bool, StorageError>;
}

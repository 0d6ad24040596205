//! Ownership-scoped key-value store
//!
//! Keys live in one global namespace but are only ever visible to the user
//! who created them. A key owned by someone else is reported exactly like
//! an absent key, so callers learn nothing of other users' keys except through
//! the `KEY_EXISTS` conflict on create.

use lockbox_core::{is_valid_key, is_valid_value, KvEntry, LockboxError, Result, User};
use std::sync::Arc;
use tracing::{debug, info};

use crate::storage::Store;

pub struct KvStore {
    store: Arc<dyn Store>,
}

impl KvStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a new entry owned by `owner`
    pub async fn put(&self, owner: &User, key: &str, value: &str) -> Result<()> {
        if !is_valid_key(key) {
            return Err(invalid_key());
        }
        if !is_valid_value(value) {
            return Err(invalid_value());
        }

        self.store
            .insert_entry(KvEntry::new(key, value, owner.id))
            .await?;

        info!(user_id = %owner.id, key = %key, "Stored entry");
        Ok(())
    }

    /// Read an entry owned by `owner`
    pub async fn get(&self, owner: &User, key: &str) -> Result<KvEntry> {
        if !is_valid_key(key) {
            return Err(LockboxError::KeyNotFound);
        }

        match self.store.get_entry(key).await? {
            Some(entry) if entry.is_owned_by(owner.id) => Ok(entry),
            _ => {
                debug!(user_id = %owner.id, key = %key, "Entry not visible to caller");
                Err(LockboxError::KeyNotFound)
            }
        }
    }

    /// Replace the value of an entry owned by `owner`
    pub async fn update(&self, owner: &User, key: &str, value: &str) -> Result<()> {
        if !is_valid_key(key) {
            return Err(invalid_key());
        }
        if !is_valid_value(value) {
            return Err(invalid_value());
        }

        if !self.store.update_entry(owner.id, key, value).await? {
            return Err(LockboxError::KeyNotFound);
        }

        info!(user_id = %owner.id, key = %key, "Updated entry");
        Ok(())
    }

    /// Remove an entry owned by `owner`
    pub async fn delete(&self, owner: &User, key: &str) -> Result<()> {
        if !is_valid_key(key) {
            return Err(LockboxError::KeyNotFound);
        }

        if !self.store.delete_entry(owner.id, key).await? {
            return Err(LockboxError::KeyNotFound);
        }

        info!(user_id = %owner.id, key = %key, "Deleted entry");
        Ok(())
    }
}

fn invalid_key() -> LockboxError {
    LockboxError::InvalidRequest(format!(
        "Key must be 1 to {} characters with no '/' or control characters.",
        lockbox_core::validation::MAX_KEY_LEN
    ))
}

fn invalid_value() -> LockboxError {
    LockboxError::InvalidRequest("Value must not contain NUL characters.".into())
}

//! In-memory storage backend
//!
//! Default storage implementation using in-memory hashmaps.
//! Suitable for development and single-instance deployments.
//! Data is lost on restart.
//!
//! All tables sit behind one lock, so every trait method is a single
//! critical section and the secondary indexes never drift from the records.

use async_trait::async_trait;
use lockbox_core::{KvEntry, Session, UserRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{StorageError, Store};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    by_username: HashMap<String, Uuid>,
    by_email: HashMap<String, Uuid>,
    by_token: HashMap<String, Uuid>,
    entries: HashMap<String, KvEntry>,
}

/// In-memory store implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn entry_count(&self) -> usize {
        self.tables.read().entries.len()
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.tables.read().users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // =========================================================================
    // Users
    // =========================================================================

    async fn insert_user(&self, record: UserRecord) -> Result<(), StorageError> {
        let mut tables = self.tables.write();

        if tables.by_username.contains_key(&record.user.username) {
            return Err(StorageError::UsernameExists);
        }
        if tables.by_email.contains_key(&record.user.email) {
            return Err(StorageError::EmailExists);
        }

        let id = record.user.id;
        tables.by_username.insert(record.user.username.clone(), id);
        tables.by_email.insert(record.user.email.clone(), id);
        if let Some(session) = &record.session {
            tables.by_token.insert(session.token.clone(), id);
        }
        debug!(user_id = %id, "Stored user");
        tables.users.insert(id, record);
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        Ok(self.tables.read().by_username.contains_key(username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        Ok(self.tables.read().by_email.contains_key(email))
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        let tables = self.tables.read();
        Ok(tables
            .by_username
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    async fn replace_session(&self, user_id: Uuid, session: Session) -> Result<(), StorageError> {
        let mut tables = self.tables.write();
        let Tables {
            users, by_token, ..
        } = &mut *tables;

        let record = users
            .get_mut(&user_id)
            .ok_or(StorageError::UserNotFound(user_id))?;

        if let Some(previous) = record.session.take() {
            by_token.remove(&previous.token);
        }
        by_token.insert(session.token.clone(), user_id);
        record.session = Some(session);

        debug!(user_id = %user_id, "Replaced session");
        Ok(())
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<UserRecord>, StorageError> {
        let tables = self.tables.read();
        Ok(tables
            .by_token
            .get(token)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    // =========================================================================
    // Key-value entries
    // =========================================================================

    async fn insert_entry(&self, entry: KvEntry) -> Result<(), StorageError> {
        let mut tables = self.tables.write();
        if tables.entries.contains_key(&entry.key) {
            return Err(StorageError::KeyExists(entry.key));
        }
        tables.entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn get_entry(&self, key: &str) -> Result<Option<KvEntry>, StorageError> {
        Ok(self.tables.read().entries.get(key).cloned())
    }

    async fn update_entry(
        &self,
        owner: Uuid,
        key: &str,
        value: &str,
    ) -> Result<bool, StorageError> {
        let mut tables = self.tables.write();
        match tables.entries.get_mut(key) {
            Some(entry) if entry.is_owned_by(owner) => {
                entry.value = value.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_entry(&self, owner: Uuid, key: &str) -> Result<bool, StorageError> {
        let mut tables = self.tables.write();
        let owned = tables
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_owned_by(owner));
        if owned {
            tables.entries.remove(key);
        }
        Ok(owned)
    }
}

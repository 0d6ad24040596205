//! Lockbox Server
//!
//! HTTP front end for Lockbox: users register, exchange their password for
//! a short-lived bearer token, and use that token to manage key-value
//! entries only they can see.
//!
//! ## Components
//!
//! - **CredentialStore**: registration and Argon2id password verification
//! - **TokenAuthority**: one live opaque token per user, lazily expired
//! - **KvStore**: globally unique keys, visible only to their owner
//! - **authorize**: bearer header to user, ahead of every data operation
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `POST /register` - Create a user
//! - `POST /token` - Issue an access token
//! - `POST /data` - Store a new entry
//! - `GET /data/{key}` - Read an entry
//! - `PUT /data/{key}` - Replace an entry's value
//! - `DELETE /data/{key}` - Delete an entry

pub mod api;
pub mod config;
pub mod core;
pub mod storage;

pub use api::create_router;
pub use api::handlers::AppState;
pub use config::{ConfigError, ServerConfig, StorageBackend};
pub use crate::core::{Clock, CredentialStore, KvStore, ManualClock, SystemClock, TokenAuthority};
pub use storage::{MemoryStore, StorageError, Store};


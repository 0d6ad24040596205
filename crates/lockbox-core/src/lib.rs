//! # Lockbox Core
//!
//! Domain types and primitives for Lockbox, a per-user key-value store
//! guarded by opaque bearer tokens.
//!
//! ## Key Concepts
//!
//! - **User**: a registered identity with a salted Argon2id password digest
//! - **Session**: the single live token attached to a user record
//! - **KvEntry**: a key-value pair owned by exactly one user
//!
//! ## Invariants
//!
//! 1. **Credential secrecy**: plaintext passwords are never stored, logged or compared
//! 2. **Token lifetime**: one live token per user, dead once expired or superseded
//! 3. **Key ownership**: keys are globally unique and visible only to their owner

pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;

pub use crypto::{generate_token, Argon2Hasher, HashParams, PasswordDigest, PasswordHasher, Secret};
pub use error::{ErrorKind, LockboxError, Result};
pub use types::{IssuedToken, KvEntry, Session, User, UserRecord};
pub use validation::{is_valid_key, is_valid_value, LoginForm, Registration, RegistrationForm};


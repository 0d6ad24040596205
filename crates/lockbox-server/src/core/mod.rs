//! Core logic for the Lockbox server

pub mod authorizer;
pub mod clock;
mod credentials;
mod kv;
mod tokens;

pub use authorizer::{authorize, bearer_token};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::CredentialStore;
pub use kv::KvStore;
pub use tokens::{TokenAuthority, DEFAULT_TOKEN_TTL_SECS};

//! Password hashing and token generation
//!
//! Passwords are hashed with Argon2id into PHC strings; the salt travels
//! inside the digest. Session tokens are 32 bytes from the OS RNG encoded as
//! unpadded URL-safe base64 (43 characters).
//!
//! Key types:
//! - `PasswordHasher`: hash/verify capability used by the credential store
//! - `Argon2Hasher`: the production implementation
//! - `PasswordDigest`: an opaque PHC string
//! - `Secret`: a plaintext password, zeroed on drop and redacted in `Debug`

use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{LockboxError, Result};

/// Random bytes per session token
pub const TOKEN_BYTES: usize = 32;

/// Length of an encoded session token
pub const TOKEN_LEN: usize = 43;

/// An irreversible password digest in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a PHC string loaded from storage
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest([redacted])")
    }
}

/// A plaintext secret that is wiped from memory on drop
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

/// Salted slow one-way hash over secrets
pub trait PasswordHasher: Send + Sync {
    /// Hash a secret with a fresh random salt
    fn hash(&self, secret: &str) -> Result<PasswordDigest>;

    /// Check a secret against a stored digest
    ///
    /// Malformed digests never verify.
    fn verify(&self, secret: &str, digest: &PasswordDigest) -> bool;
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl HashParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

impl Default for HashParams {
    fn default() -> Self {
        Self::new(Params::DEFAULT_M_COST, Params::DEFAULT_T_COST, Params::DEFAULT_P_COST)
    }
}

/// Argon2id password hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with explicit cost parameters
    pub fn new(params: HashParams) -> Result<Self> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| LockboxError::Internal(format!("invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<PasswordDigest> {
        use argon2::password_hash::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        let phc = self.argon2().hash_password(secret.as_bytes(), &salt)?;
        Ok(PasswordDigest(phc.to_string()))
    }

    fn verify(&self, secret: &str, digest: &PasswordDigest) -> bool {
        match PasswordHash::new(digest.as_str()) {
            // Parameters are read from the digest, so older cost settings still verify
            Ok(parsed) => self
                .argon2()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!(error = %e, "Stored password digest is malformed");
                false
            }
        }
    }
}

/// Generate a fresh opaque session token
pub fn generate_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

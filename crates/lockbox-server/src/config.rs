//! Server configuration
//!
//! Read once from the environment at startup. Every variable has a default
//! except the database URL; a value that is present but unparseable stops
//! startup instead of silently falling back.

use chrono::Duration;
use lockbox_core::HashParams;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;
use tracing::Level;

use crate::core::DEFAULT_TOKEN_TTL_SECS;

pub const DEFAULT_PORT: u16 = 8000;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Where user records and entries are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres(String),
}

/// Lockbox server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind: IpAddr,
    pub port: u16,
    pub log_level: Level,
    /// Lifetime of issued access tokens
    pub token_ttl: Duration,
    /// PostgreSQL connection string; memory storage when absent
    pub database_url: Option<String>,
    /// Argon2id cost parameters for new password hashes
    pub hash_params: HashParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            log_level: Level::INFO,
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            database_url: None,
            hash_params: HashParams::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `LOCKBOX_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ttl_secs: i64 = parse(&lookup, "LOCKBOX_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "LOCKBOX_TOKEN_TTL_SECS",
                reason: "must be a positive number of seconds".into(),
            });
        }

        let hash_params = HashParams::new(
            parse(&lookup, "LOCKBOX_ARGON2_M", defaults.hash_params.memory_kib)?,
            parse(&lookup, "LOCKBOX_ARGON2_T", defaults.hash_params.iterations)?,
            parse(&lookup, "LOCKBOX_ARGON2_P", defaults.hash_params.parallelism)?,
        );

        Ok(Self {
            bind: parse(&lookup, "LOCKBOX_BIND", defaults.bind)?,
            port: parse(&lookup, "LOCKBOX_PORT", defaults.port)?,
            log_level: parse(&lookup, "LOCKBOX_LOG_LEVEL", defaults.log_level)?,
            token_ttl: Duration::seconds(ttl_secs),
            database_url: lookup("LOCKBOX_DATABASE_URL").filter(|url| !url.is_empty()),
            hash_params,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Choose the storage backend for this build
    ///
    /// A database URL on a build without the `postgres` feature is an error
    /// rather than a quiet fall back to memory.
    pub fn storage_backend(&self) -> Result<StorageBackend, ConfigError> {
        match &self.database_url {
            None => Ok(StorageBackend::Memory),
            Some(_) if !cfg!(feature = "postgres") => Err(ConfigError::Invalid {
                var: "LOCKBOX_DATABASE_URL",
                reason: "this build has no postgres support".into(),
            }),
            Some(url) => Ok(StorageBackend::Postgres(url.clone())),
        }
    }
}

fn parse<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

//! API request handlers

pub mod data;
pub mod users;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use std::sync::Arc;

use lockbox_core::{LockboxError, PasswordHasher, Result as LockboxResult, User};

use crate::api::error::ApiError;
use crate::config::ServerConfig;
use crate::core::{authorize, Clock, CredentialStore, KvStore, TokenAuthority};
use crate::storage::Store;

pub use data::{delete_data, retrieve_data, store_data, update_data, StoreDataRequest, UpdateDataRequest};
pub use users::{issue_token, register};

/// Application state shared across handlers
pub struct AppState {
    pub credentials: CredentialStore,
    pub tokens: TokenAuthority,
    pub kv: KvStore,
}

impl AppState {
    /// Wire the components over one shared store
    pub fn new(
        config: &ServerConfig,
        store: Arc<dyn Store>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> LockboxResult<Self> {
        Ok(Self {
            credentials: CredentialStore::new(Arc::clone(&store), hasher)?,
            tokens: TokenAuthority::new(Arc::clone(&store), clock, config.token_ttl),
            kv: KvStore::new(store),
        })
    }
}

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(message: &'static str, data: T) -> Self {
        Self {
            status: "success",
            message: Some(message),
            data: Some(data),
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            status: "success",
            message: Some(message),
            data: None,
        }
    }
}

/// The user behind the request's bearer token
///
/// Rejects with `INVALID_TOKEN` before the body is read.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| LockboxError::InvalidToken)?),
            None => None,
        };
        let user = authorize(&state.tokens, header).await?;
        Ok(Authenticated(user))
    }
}

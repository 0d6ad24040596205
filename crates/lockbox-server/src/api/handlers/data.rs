//! Key-value data handlers
//!
//! Every handler takes [`Authenticated`] first, so the bearer token is
//! resolved before the path or body is looked at. A key segment that does
//! not decode is treated like any other invalid key: absent on read and
//! delete, a bad request on update.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use lockbox_core::{KvEntry, LockboxError};

use super::{ApiResponse, AppState, Authenticated};
use crate::api::error::ApiError;

/// Request to store a new entry
#[derive(Debug, Deserialize)]
pub struct StoreDataRequest {
    pub key: String,
    pub value: String,
}

/// Request to replace an entry's value
#[derive(Debug, Deserialize)]
pub struct UpdateDataRequest {
    pub value: String,
}

/// Store a new entry for the caller
///
/// POST /data
pub async fn store_data(
    Authenticated(user): Authenticated,
    State(state): State<Arc<AppState>>,
    body: Result<Json<StoreDataRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Json(request) = body?;
    state.kv.put(&user, &request.key, &request.value).await?;
    Ok(Json(ApiResponse::message("Data stored successfully.")))
}

/// Read one of the caller's entries
///
/// GET /data/{key}
pub async fn retrieve_data(
    Authenticated(user): Authenticated,
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<KvEntry>>, ApiError> {
    let Path(key) = path.map_err(|_| LockboxError::KeyNotFound)?;
    let entry = state.kv.get(&user, &key).await?;
    Ok(Json(ApiResponse::data(entry)))
}

/// Replace the value of one of the caller's entries
///
/// PUT /data/{key}
pub async fn update_data(
    Authenticated(user): Authenticated,
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateDataRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Path(key) = path?;
    let Json(request) = body?;
    state.kv.update(&user, &key, &request.value).await?;
    Ok(Json(ApiResponse::message("Data updated successfully.")))
}

/// Delete one of the caller's entries
///
/// DELETE /data/{key}
pub async fn delete_data(
    Authenticated(user): Authenticated,
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Path(key) = path.map_err(|_| LockboxError::KeyNotFound)?;
    state.kv.delete(&user, &key).await?;
    Ok(Json(ApiResponse::message("Data deleted successfully.")))
}

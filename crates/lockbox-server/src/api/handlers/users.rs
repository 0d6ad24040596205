//! Registration and token handlers

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use std::sync::Arc;

use lockbox_core::{IssuedToken, LockboxError, LoginForm, RegistrationForm, User};

use super::{ApiResponse, AppState};
use crate::api::error::ApiError;

/// Register a new user
///
/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegistrationForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let Json(form) = body?;
    let user = state.credentials.register(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("User successfully registered!", user)),
    ))
}

/// Exchange a username and password for an access token
///
/// POST /token
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginForm>, JsonRejection>,
) -> Result<Json<ApiResponse<IssuedToken>>, ApiError> {
    // Any unreadable body counts as missing credentials here
    let Json(form) = body.map_err(|_| LockboxError::MissingFields)?;
    let (username, password) = form.into_parts()?;

    let user = state.credentials.verify(&username, password).await?;
    let issued = state.tokens.issue(&user).await?;

    Ok(Json(ApiResponse::with_data(
        "Access token generated successfully.",
        issued,
    )))
}

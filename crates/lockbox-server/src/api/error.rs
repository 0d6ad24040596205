//! API error types and responses

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lockbox_core::{ErrorKind, LockboxError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] LockboxError),

    /// Request body was not valid JSON for the expected shape
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    /// A path segment could not be decoded
    #[error("Malformed path: {0}")]
    MalformedPath(String),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// The domain error this maps to on the wire
    pub fn as_domain(&self) -> LockboxError {
        match self {
            ApiError::Domain(err) => err.clone(),
            ApiError::MalformedBody(detail) | ApiError::MalformedPath(detail) => {
                LockboxError::InvalidRequest(detail.clone())
            }
        }
    }
}

pub fn status_for(err: &LockboxError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.as_domain();
        if let LockboxError::Internal(detail) = &err {
            error!(detail = %detail, "Request failed with internal error");
        }

        let body = ErrorResponse {
            status: "error",
            code: err.code().to_string(),
            message: err.public_message(),
        };

        (status_for(&err), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedPath(rejection.body_text())
    }
}

//! Request authorizer
//!
//! Turns the raw `Authorization` header into an authenticated user before
//! any data operation runs. Stateless apart from the token authority it
//! consults.

use lockbox_core::{LockboxError, Result, User};

use super::tokens::TokenAuthority;

const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively. Returns `None` for any other
/// scheme or an empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the presented header to a live user, or fail with `INVALID_TOKEN`
pub async fn authorize(tokens: &TokenAuthority, header: Option<&str>) -> Result<User> {
    let token = header
        .and_then(bearer_token)
        .ok_or(LockboxError::InvalidToken)?;
    tokens.resolve(token).await
}

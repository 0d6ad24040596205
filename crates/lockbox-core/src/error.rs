//! Error types for Lockbox
//!
//! Every failure a caller can observe maps to exactly one wire code. The
//! taxonomy is split into validation, conflict, authentication and not-found
//! errors, plus a single internal variant for faults the caller cannot fix.

use thiserror::Error;

/// Result type alias using LockboxError
pub type Result<T> = std::result::Result<T, LockboxError>;

/// Broad category of a [`LockboxError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input, rejected before storage is touched
    Validation,
    /// Uniqueness violation on username, email or key
    Conflict,
    /// Bad credentials or an invalid/expired token
    Authentication,
    /// Key absent or owned by someone else
    NotFound,
    /// Unexpected fault below the domain layer
    Internal,
}

/// Errors that can occur in Lockbox
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockboxError {
    /// A required field is missing or malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Username or password missing on authentication
    #[error("Missing fields: username and password are required")]
    MissingFields,

    /// Username already registered
    #[error("Username already exists")]
    UsernameExists,

    /// Email already registered
    #[error("Email already exists")]
    EmailExists,

    /// Password shorter than the minimum length
    #[error("Password does not meet the requirements")]
    InvalidPassword,

    /// Age is zero or negative
    #[error("Age must be a positive integer")]
    InvalidAge,

    /// Gender is empty
    #[error("Gender is required")]
    GenderRequired,

    /// Unknown username or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token unknown, superseded or expired
    #[error("Invalid access token")]
    InvalidToken,

    /// Key already claimed by some user
    #[error("Key already exists")]
    KeyExists,

    /// Key absent, or present but owned by another user
    #[error("Key not found")]
    KeyNotFound,

    /// Storage or hashing fault
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LockboxError {
    /// Stable wire code for this error
    pub fn code(&self) -> &'static str {
        match self {
            LockboxError::InvalidRequest(_) => "INVALID_REQUEST",
            LockboxError::MissingFields => "MISSING_FIELDS",
            LockboxError::UsernameExists => "USERNAME_EXISTS",
            LockboxError::EmailExists => "EMAIL_EXISTS",
            LockboxError::InvalidPassword => "INVALID_PASSWORD",
            LockboxError::InvalidAge => "INVALID_AGE",
            LockboxError::GenderRequired => "GENDER_REQUIRED",
            LockboxError::InvalidCredentials => "INVALID_CREDENTIALS",
            LockboxError::InvalidToken => "INVALID_TOKEN",
            LockboxError::KeyExists => "KEY_EXISTS",
            LockboxError::KeyNotFound => "KEY_NOT_FOUND",
            LockboxError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LockboxError::InvalidRequest(_)
            | LockboxError::MissingFields
            | LockboxError::InvalidPassword
            | LockboxError::InvalidAge
            | LockboxError::GenderRequired => ErrorKind::Validation,
            LockboxError::UsernameExists | LockboxError::EmailExists | LockboxError::KeyExists => {
                ErrorKind::Conflict
            }
            LockboxError::InvalidCredentials | LockboxError::InvalidToken => {
                ErrorKind::Authentication
            }
            LockboxError::KeyNotFound => ErrorKind::NotFound,
            LockboxError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable message sent to clients
    ///
    /// Internal errors never leak their detail here.
    pub fn public_message(&self) -> String {
        match self {
            LockboxError::InvalidRequest(detail) => format!("Invalid request. {}", detail),
            LockboxError::MissingFields => {
                "Missing fields. Please provide both username and password.".into()
            }
            LockboxError::UsernameExists => {
                "The provided username is already taken. Please choose a different username.".into()
            }
            LockboxError::EmailExists => {
                "The provided email is already registered. Please use a different email address."
                    .into()
            }
            LockboxError::InvalidPassword => {
                "The provided password does not meet the requirements.".into()
            }
            LockboxError::InvalidAge => {
                "Invalid age value. Age must be a positive integer.".into()
            }
            LockboxError::GenderRequired => {
                "Gender field is required. Please specify the gender.".into()
            }
            LockboxError::InvalidCredentials => {
                "Invalid credentials. The provided username or password is incorrect.".into()
            }
            LockboxError::InvalidToken => "Invalid access token provided.".into(),
            LockboxError::KeyExists => "The provided key already exists in the database. \
                 To update an existing key, use the update API."
                .into(),
            LockboxError::KeyNotFound => "The provided key does not exist in the database.".into(),
            LockboxError::Internal(_) => "An internal error occurred.".into(),
        }
    }
}

impl From<argon2::password_hash::Error> for LockboxError {
    fn from(err: argon2::password_hash::Error) -> Self {
        LockboxError::Internal(format!("password hashing failed: {}", err))
    }
}

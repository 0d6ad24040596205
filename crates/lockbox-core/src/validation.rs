//! Input validation
//!
//! Registration is checked in two phases so the error order stays fixed:
//! [`RegistrationForm::well_formed`] runs before any storage lookup, and
//! [`Registration::check_policy`] runs after the uniqueness checks.

use serde::Deserialize;

use crate::crypto::Secret;
use crate::error::{LockboxError, Result};

pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_FULL_NAME_LEN: usize = 100;
pub const MAX_GENDER_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_KEY_LEN: usize = 100;

/// Raw registration input; any field may be absent
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<Secret>,
    pub full_name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

/// Registration input that passed the well-formedness check
///
/// Password length, age and gender are still unchecked; see
/// [`Registration::check_policy`].
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: Secret,
    pub full_name: String,
    pub age: i64,
    pub gender: String,
}

impl RegistrationForm {
    /// Require every field and check its shape
    pub fn well_formed(self) -> Result<Registration> {
        let username = require(self.username, "username")?;
        let email = require(self.email, "email")?;
        let password = self
            .password
            .ok_or_else(|| missing("password"))?;
        let full_name = require(self.full_name, "full_name")?;
        let age = self.age.ok_or_else(|| missing("age"))?;
        let gender = require(self.gender, "gender")?;

        if !is_valid_username(&username) {
            return Err(LockboxError::InvalidRequest(format!(
                "Username must be 1 to {} characters.",
                MAX_USERNAME_LEN
            )));
        }
        if !is_valid_email(&email) {
            return Err(LockboxError::InvalidRequest(
                "Please provide a valid email address.".into(),
            ));
        }
        let name_len = full_name.chars().count();
        if name_len == 0
            || name_len > MAX_FULL_NAME_LEN
            || full_name.trim().is_empty()
            || full_name.contains('\0')
        {
            return Err(LockboxError::InvalidRequest(format!(
                "Full name must be 1 to {} characters.",
                MAX_FULL_NAME_LEN
            )));
        }
        if age > i64::from(u32::MAX) {
            return Err(LockboxError::InvalidRequest("Age is out of range.".into()));
        }
        if gender.contains('\0') {
            return Err(LockboxError::InvalidRequest(
                "Gender must not contain NUL characters.".into(),
            ));
        }
        if gender.chars().count() > MAX_GENDER_LEN {
            return Err(LockboxError::InvalidRequest(format!(
                "Gender must be at most {} characters.",
                MAX_GENDER_LEN
            )));
        }

        Ok(Registration {
            username,
            email,
            password,
            full_name,
            age,
            gender,
        })
    }
}

impl Registration {
    /// Password, age and gender rules, in that order
    ///
    /// Returns the age narrowed to its stored type.
    pub fn check_policy(&self) -> Result<u32> {
        if self.password.expose().chars().count() < MIN_PASSWORD_LEN {
            return Err(LockboxError::InvalidPassword);
        }
        let age = match u32::try_from(self.age) {
            Ok(age) if age > 0 => age,
            _ => return Err(LockboxError::InvalidAge),
        };
        if self.gender.trim().is_empty() {
            return Err(LockboxError::GenderRequired);
        }
        Ok(age)
    }
}

/// Raw authentication input
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<Secret>,
}

impl LoginForm {
    /// Both fields present and non-empty, else `MISSING_FIELDS`
    pub fn into_parts(self) -> Result<(String, Secret)> {
        match (self.username, self.password) {
            (Some(username), Some(password))
                if !username.is_empty() && !password.expose().is_empty() =>
            {
                Ok((username, password))
            }
            _ => Err(LockboxError::MissingFields),
        }
    }
}

fn require(field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| missing(name))
}

fn missing(name: &str) -> LockboxError {
    LockboxError::InvalidRequest(format!(
        "Please provide all required fields: username, email, password, full_name, age, gender. \
         Missing: {}.",
        name
    ))
}

pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (1..=MAX_USERNAME_LEN).contains(&len) && !username.chars().any(char::is_control)
}

/// Structural email check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Key rule applied identically by put, get, update and delete
pub fn is_valid_key(key: &str) -> bool {
    let len = key.chars().count();
    (1..=MAX_KEY_LEN).contains(&len) && !key.chars().any(|c| c.is_control() || c == '/')
}

/// Values may be empty but never carry NUL, which text columns reject
pub fn is_valid_value(value: &str) -> bool {
    !value.contains('\0')
}

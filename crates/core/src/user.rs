//! User types.
//!
//! [`User`] is what the API returns. [`UserDraft`] is what clients send to
//! create or update a user; [`UserDraft::validate`] turns it into a
//! [`ValidDraft`] that satisfies the `users` collection schema.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError, UserId};
use crate::validation::{
    NAME_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
    ValidationErrors, char_len,
};

/// A user as exposed over the API.
///
/// The stored password hash never leaves the server, so it has no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document ID (hex `ObjectId`).
    pub id: UserId,
    /// Unique login name, 3-50 characters.
    pub username: String,
    /// Unique email address.
    pub email: Email,
    /// Optional first name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Whether the account is active.
    pub active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

/// Request body for creating or updating a user.
///
/// `active` defaults to `true` when omitted. `password` is optional: users
/// created from the form have none and get a generated credential server-side.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    /// Requested username.
    pub username: String,
    /// Requested email address.
    pub email: String,
    /// Optional first name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Active flag.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Optional plain-text password (hashed before storage).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDraft")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("active", &self.active)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl UserDraft {
    /// Create an active draft with no names and no password.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            active: true,
            password: None,
        }
    }

    /// Check the draft against the `users` document rules.
    ///
    /// Blank first/last names are normalized to `None`.
    ///
    /// # Errors
    ///
    /// Returns every rejected field at once.
    pub fn validate(self) -> Result<ValidDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let username_len = char_len(self.username.trim());
        if username_len == 0 {
            errors.push("username", "Username is required");
        } else if char_len(&self.username) < USERNAME_MIN_LENGTH
            || char_len(&self.username) > USERNAME_MAX_LENGTH
        {
            errors.push(
                "username",
                format!(
                    "Username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
                ),
            );
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(EmailError::Empty) => {
                errors.push("email", "Email is required");
                None
            }
            Err(EmailError::Malformed) => {
                errors.push("email", "Email must be a valid email address");
                None
            }
        };

        if let Some(password) = &self.password
            && char_len(password) < PASSWORD_MIN_LENGTH
        {
            errors.push(
                "password",
                format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
            );
        }

        check_name(&mut errors, "firstName", "First name", self.first_name.as_deref());
        check_name(&mut errors, "lastName", "Last name", self.last_name.as_deref());

        match email {
            Some(email) if errors.is_empty() => Ok(ValidDraft {
                username: self.username,
                email,
                first_name: non_blank(self.first_name),
                last_name: non_blank(self.last_name),
                active: self.active,
                password: self.password,
            }),
            _ => Err(errors),
        }
    }
}

fn check_name(errors: &mut ValidationErrors, field: &'static str, label: &str, value: Option<&str>) {
    if let Some(value) = value
        && char_len(value) > NAME_MAX_LENGTH
    {
        errors.push(
            field,
            format!("{label} must not exceed {NAME_MAX_LENGTH} characters"),
        );
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// A draft that passed [`UserDraft::validate`].
#[derive(Clone, PartialEq, Eq)]
pub struct ValidDraft {
    /// Username, 3-50 characters.
    pub username: String,
    /// Parsed email.
    pub email: Email,
    /// First name, `None` when blank.
    pub first_name: Option<String>,
    /// Last name, `None` when blank.
    pub last_name: Option<String>,
    /// Active flag.
    pub active: bool,
    /// Plain-text password of at least 6 characters, if one was supplied.
    pub password: Option<String>,
}

impl fmt::Debug for ValidDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidDraft")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("active", &self.active)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

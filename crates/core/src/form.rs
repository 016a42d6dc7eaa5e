//! The "create user" form and its submit-time validation.
//!
//! These rules are looser than [`UserDraft::validate`](crate::UserDraft::validate):
//! the form only checks what a user can fix before submitting (required
//! fields, minimum username length, email shape, name length). The server
//! applies the full document rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError};
use crate::user::UserDraft;
use crate::validation::{NAME_MAX_LENGTH, USERNAME_MIN_LENGTH, char_len};

/// One of the form's input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Username,
    Email,
    FirstName,
    LastName,
}

impl FormField {
    /// All fields, in display order.
    pub const ALL: [Self; 4] = [Self::Username, Self::Email, Self::FirstName, Self::LastName];

    /// Wire name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
        }
    }
}

/// Input values of the form. All fields start empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserForm {
    /// Current value of a field.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Username => &self.username,
            FormField::Email => &self.email,
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Username => &mut self.username,
            FormField::Email => &mut self.email,
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
        };
        *slot = value.into();
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply the submit-time rules.
    #[must_use]
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        if self.username.trim().is_empty() {
            errors.insert(FormField::Username, "Username is required");
        } else if char_len(&self.username) < USERNAME_MIN_LENGTH {
            errors.insert(
                FormField::Username,
                format!("Username must be at least {USERNAME_MIN_LENGTH} characters"),
            );
        }

        match Email::parse(&self.email) {
            Ok(_) => {}
            Err(EmailError::Empty) => errors.insert(FormField::Email, "Email is required"),
            Err(EmailError::Malformed) => errors.insert(FormField::Email, "Email is invalid"),
        }

        if char_len(&self.first_name) > NAME_MAX_LENGTH {
            errors.insert(
                FormField::FirstName,
                format!("First name must not exceed {NAME_MAX_LENGTH} characters"),
            );
        }

        if char_len(&self.last_name) > NAME_MAX_LENGTH {
            errors.insert(
                FormField::LastName,
                format!("Last name must not exceed {NAME_MAX_LENGTH} characters"),
            );
        }

        errors
    }

    /// Build the request body sent on submit.
    ///
    /// Empty names are sent as absent rather than as empty strings.
    #[must_use]
    pub fn to_draft(&self) -> UserDraft {
        let optional = |s: &str| (!s.is_empty()).then(|| s.to_owned());

        UserDraft {
            first_name: optional(&self.first_name),
            last_name: optional(&self.last_name),
            ..UserDraft::new(self.username.clone(), self.email.clone())
        }
    }
}

/// Per-field error messages, parallel to [`UserForm`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    messages: BTreeMap<FormField, String>,
}

impl FormErrors {
    fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.messages.insert(field, message.into());
    }

    /// Message for `field`, if it was rejected.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.messages.get(&field).map(String::as_str)
    }

    /// Forget the message for `field` (done as soon as the user edits it).
    pub fn clear(&mut self, field: FormField) {
        self.messages.remove(&field);
    }

    /// Returns `true` when nothing was rejected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of rejected fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Rejected fields and their messages, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.messages.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

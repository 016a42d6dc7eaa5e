//! Field limits and validation errors.
//!
//! The limits mirror the `$jsonSchema` validators declared on the `users` and
//! `products` collections, so a document that passes here also passes the
//! store.

use serde::Serialize;

/// Minimum username length.
pub const USERNAME_MIN_LENGTH: usize = 3;
/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 50;
/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;
/// Maximum first/last name length.
pub const NAME_MAX_LENGTH: usize = 100;
/// Maximum product name length.
pub const PRODUCT_NAME_MAX_LENGTH: usize = 200;
/// Maximum product description length.
pub const PRODUCT_DESCRIPTION_MAX_LENGTH: usize = 1000;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field (camelCase, as in JSON).
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// All the fields rejected by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Record a rejected field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Returns `true` when no field was rejected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The rejected fields, in the order they were checked.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns `true` if `field` was rejected.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field was rejected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Character count, not byte length.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shape accepted for email addresses: `<non-space>+@<non-space>+.<non-space>+`.
///
/// This is the same pattern the `users` collection validator enforces.
pub const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // constant pattern, covered by tests
    Regex::new(EMAIL_PATTERN).expect("email pattern compiles")
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty or only whitespace.
    #[error("email cannot be empty")]
    Empty,
    /// The input does not have the `local@domain.tld` shape.
    #[error("email must look like name@domain.tld")]
    Malformed,
}

/// An email address.
///
/// ## Constraints
///
/// - Not blank
/// - Matches [`EMAIL_PATTERN`]: no whitespace anywhere, an `@` with text on
///   both sides, and a `.` with text after it in the domain
///
/// ## Examples
///
/// ```
/// use fullstack_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("admin@fullstack.local").is_ok());
/// assert!(Email::parse("a@b.c").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());            // empty
/// assert!(Email::parse("bad").is_err());         // missing @
/// assert!(Email::parse("user@domain").is_err()); // no dot after @
/// assert!(Email::parse("a b@c.d").is_err());     // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] for blank input and
    /// [`EmailError::Malformed`] when the input does not match
    /// [`EMAIL_PATTERN`].
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.trim().is_empty() {
            return Err(EmailError::Empty);
        }

        if !EMAIL_REGEX.is_match(s) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

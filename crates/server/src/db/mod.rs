//! Database access for the `MongoDB` document store.
//!
//! # Database: `fullstack_dev`
//!
//! ## Collections
//!
//! - `users` - Application users (unique `username` and `email`)
//! - `products` - Sample catalogue, written only by the seed
//!
//! Both collections are created with `$jsonSchema` validators (see
//! [`schema`]). Run the seed once against an empty database:
//! ```bash
//! cargo run -p fullstack-cli -- seed
//! ```

pub mod memory;
pub mod schema;
pub mod seed;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use secrecy::ExposeSecret;
use thiserror::Error;

use fullstack_core::{Email, User, UserId};

use crate::config::DatabaseConfig;

pub use memory::MemoryUserStore;
pub use users::MongoUserStore;

/// Name of the users collection.
pub const USERS: &str = "users";
/// Name of the products collection.
pub const PRODUCTS: &str = "products";

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from the driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a write error, turning unique index violations into `Conflict`.
    pub(crate) fn from_write(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            Self::Conflict(err.to_string())
        } else {
            Self::Database(err)
        }
    }
}

/// Returns `true` if the driver error is a unique index violation.
#[must_use]
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY)),
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Connect to `MongoDB` and select the configured database.
///
/// The driver pools connections internally; the returned handle is cheap to
/// clone.
///
/// # Errors
///
/// Returns the driver error if the connection string is invalid.
pub async fn connect(config: &DatabaseConfig) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(config.uri.expose_secret()).await?;
    options.app_name = Some("fullstack-server".to_string());
    options.server_selection_timeout = Some(Duration::from_secs(10));

    let client = Client::with_options(options)?;
    Ok(client.database(&config.name))
}

/// A user ready to be inserted.
///
/// The password is already hashed.
#[derive(Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub email: Email,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: bool,
}

impl std::fmt::Debug for NewUserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUserRecord")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("active", &self.active)
            .finish()
    }
}

/// Full replacement of a user's editable fields.
///
/// Absent names are removed from the document. `password_hash` is only
/// written when `Some`.
#[derive(Clone)]
pub struct UserChanges {
    pub username: String,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: bool,
    pub password_hash: Option<String>,
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("active", &self.active)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Storage for user documents.
///
/// Implementations enforce unique `username` and `email`, reporting
/// violations as [`RepositoryError::Conflict`]. Unknown and malformed ids are
/// treated the same: `None` from reads, [`RepositoryError::NotFound`] from
/// writes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every user, in insertion order.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Users with `active == true`.
    async fn list_active(&self) -> Result<Vec<User>, RepositoryError>;

    async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Users whose first name contains `fragment`, ignoring case.
    async fn search_by_first_name(&self, fragment: &str) -> Result<Vec<User>, RepositoryError>;

    async fn count_by_active(&self, active: bool) -> Result<u64, RepositoryError>;

    /// Insert a user, stamping `createdAt` and `updatedAt` with `now`.
    async fn insert(
        &self,
        record: NewUserRecord,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError>;

    /// Replace editable fields and bump `updatedAt`.
    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError>;

    /// Set the active flag and bump `updatedAt`.
    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError>;

    async fn delete(&self, id: &UserId) -> Result<(), RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

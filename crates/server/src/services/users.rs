//! User management service.
//!
//! Validates drafts, enforces unique usernames and emails, hashes passwords
//! and timestamps writes before handing them to a [`UserStore`].

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::instrument;

use fullstack_core::{User, UserDraft, UserId, ValidationErrors};

use crate::db::{NewUserRecord, RepositoryError, UserChanges, UserStore};

/// Length of the throw-away password generated for drafts without one.
const GENERATED_PASSWORD_LENGTH: usize = 32;

/// Errors from user operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The draft broke a document rule.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("User not found")]
    NotFound,

    #[error("Failed to hash password")]
    PasswordHash,

    /// Storage failure, including unique index violations.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// Hash a password with Argon2 and a fresh salt.
///
/// # Errors
///
/// Returns `ServiceError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ServiceError::PasswordHash)
}

/// Random alphanumeric password that nobody knows.
fn generate_random_password(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .filter_map(|_| CHARSET.get(rng.random_range(0..CHARSET.len())))
        .map(|b| char::from(*b))
        .collect()
}

/// User operations over any [`UserStore`].
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn active_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.list_active().await?)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<Option<User>, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.store.get_by_username(username).await?)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.store.get_by_email(email).await?)
    }

    pub async fn search_by_first_name(&self, first_name: &str) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.search_by_first_name(first_name).await?)
    }

    pub async fn count_by_active(&self, active: bool) -> Result<u64, ServiceError> {
        Ok(self.store.count_by_active(active).await?)
    }

    /// Create a user.
    ///
    /// A draft without a password is stored with the hash of a random one.
    ///
    /// # Errors
    ///
    /// `Validation` for rule violations, `UsernameTaken` / `EmailTaken` when
    /// the value is already in use, `Repository(Conflict)` when the unique
    /// index catches a concurrent insert.
    #[instrument(skip(self, draft), fields(username = %draft.username))]
    pub async fn create_user(&self, draft: UserDraft) -> Result<User, ServiceError> {
        let valid = draft.validate()?;

        if self.store.get_by_username(&valid.username).await?.is_some() {
            return Err(ServiceError::UsernameTaken);
        }
        if self.store.get_by_email(valid.email.as_str()).await?.is_some() {
            return Err(ServiceError::EmailTaken);
        }

        let password = valid
            .password
            .unwrap_or_else(|| generate_random_password(GENERATED_PASSWORD_LENGTH));

        let record = NewUserRecord {
            username: valid.username,
            email: valid.email,
            password_hash: hash_password(&password)?,
            first_name: valid.first_name,
            last_name: valid.last_name,
            active: valid.active,
        };

        let user = self.store.insert(record, Utc::now()).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Replace a user's editable fields.
    ///
    /// The stored password is kept unless the draft carries a new one.
    ///
    /// # Errors
    ///
    /// `Validation`, `NotFound`, or `Repository(Conflict)` when the new
    /// username or email belongs to someone else.
    #[instrument(skip(self, draft), fields(user_id = %id))]
    pub async fn update_user(&self, id: &UserId, draft: UserDraft) -> Result<User, ServiceError> {
        let valid = draft.validate()?;

        let password_hash = valid.password.as_deref().map(hash_password).transpose()?;

        let changes = UserChanges {
            username: valid.username,
            email: valid.email,
            first_name: valid.first_name,
            last_name: valid.last_name,
            active: valid.active,
            password_hash,
        };

        let user = self.store.update(id, changes, Utc::now()).await?;
        tracing::info!("User updated");
        Ok(user)
    }

    /// # Errors
    ///
    /// `NotFound` when no user has `id`.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        tracing::info!("User deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// `NotFound` when no user has `id`.
    pub async fn activate_user(&self, id: &UserId) -> Result<User, ServiceError> {
        Ok(self.store.set_active(id, true, Utc::now()).await?)
    }

    /// # Errors
    ///
    /// `NotFound` when no user has `id`.
    pub async fn deactivate_user(&self, id: &UserId) -> Result<User, ServiceError> {
        Ok(self.store.set_active(id, false, Utc::now()).await?)
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;
    use crate::db::MemoryUserStore;

    fn service() -> (UserService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (UserService::new(store.clone()), store)
    }

    fn verifies(password: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).unwrap();
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    #[test]
    fn test_generated_password() {
        let a = generate_random_password(GENERATED_PASSWORD_LENGTH);
        let b = generate_random_password(GENERATED_PASSWORD_LENGTH);
        assert_eq!(a.len(), GENERATED_PASSWORD_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_create_rejects_taken_username_and_email() {
        let (service, _) = service();
        service
            .create_user(UserDraft::new("admin", "admin@x.io"))
            .await
            .unwrap();

        let err = service
            .create_user(UserDraft::new("admin", "new@x.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UsernameTaken));
        assert_eq!(err.to_string(), "Username already exists");

        let err = service
            .create_user(UserDraft::new("newbie", "admin@x.io"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already exists");
    }

    #[tokio::test]
    async fn test_create_validates_before_touching_store() {
        let (service, store) = service();
        let err = service
            .create_user(UserDraft::new("ab", "bad"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let (service, store) = service();
        let mut draft = UserDraft::new("jdoe", "jdoe@x.io");
        draft.password = Some("s3cret!".into());

        let user = service.create_user(draft).await.unwrap();
        let hash = store.password_hash(&user.id).await.unwrap();
        assert_ne!(hash, "s3cret!");
        assert!(verifies("s3cret!", &hash));
    }

    #[tokio::test]
    async fn test_update_keeps_password_unless_given() {
        let (service, store) = service();
        let mut draft = UserDraft::new("jdoe", "jdoe@x.io");
        draft.password = Some("first-pass".into());
        let user = service.create_user(draft).await.unwrap();
        let original = store.password_hash(&user.id).await.unwrap();

        let mut edit = UserDraft::new("jdoe2", "jdoe@x.io");
        edit.first_name = Some("John".into());
        let updated = service.update_user(&user.id, edit).await.unwrap();
        assert_eq!(updated.username, "jdoe2");
        assert_eq!(updated.first_name.as_deref(), Some("John"));
        assert!(updated.updated_at >= user.updated_at);
        assert_eq!(store.password_hash(&user.id).await.unwrap(), original);

        let mut edit = UserDraft::new("jdoe2", "jdoe@x.io");
        edit.password = Some("second-pass".into());
        service.update_user(&user.id, edit).await.unwrap();
        let changed = store.password_hash(&user.id).await.unwrap();
        assert!(verifies("second-pass", &changed));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let (service, _) = service();
        let id = UserId::new("65a1f0c2e4b0a1b2c3d4e5f6");

        assert!(service.get_user(&id).await.unwrap().is_none());
        assert!(matches!(
            service.delete_user(&id).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.activate_user(&id).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.update_user(&id, UserDraft::new("jdoe", "j@x.io")).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_activation_and_counts() {
        let (service, _) = service();
        let user = service
            .create_user(UserDraft::new("jdoe", "jdoe@x.io"))
            .await
            .unwrap();

        service.deactivate_user(&user.id).await.unwrap();
        assert_eq!(service.count_by_active(true).await.unwrap(), 0);
        assert_eq!(service.count_by_active(false).await.unwrap(), 1);
        assert!(service.active_users().await.unwrap().is_empty());

        let user = service.activate_user(&user.id).await.unwrap();
        assert!(user.active);
        assert_eq!(service.active_users().await.unwrap().len(), 1);
    }
}

//! In-memory user repository.
//!
//! Behaves like [`MongoUserStore`](super::MongoUserStore) (unique username
//! and email, 24-hex ids, insertion order) without a server. Used by the
//! router tests and for running the API locally without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use fullstack_core::{User, UserId};

use super::{NewUserRecord, RepositoryError, UserChanges, UserStore};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Users held in a `Vec` behind a lock.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<StoredUser>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored password hash for `id`, if the user exists.
    pub async fn password_hash(&self, id: &UserId) -> Option<String> {
        self.users
            .read()
            .await
            .iter()
            .find(|s| &s.user.id == id)
            .map(|s| s.password_hash.clone())
    }
}

/// Report a clash with any user other than `except`.
fn check_unique(
    users: &[StoredUser],
    username: &str,
    email: &str,
    except: Option<&UserId>,
) -> Result<(), RepositoryError> {
    for stored in users.iter().filter(|s| Some(&s.user.id) != except) {
        if stored.user.username == username {
            return Err(RepositoryError::Conflict(format!(
                "duplicate key: username \"{username}\""
            )));
        }
        if stored.user.email.as_str() == email {
            return Err(RepositoryError::Conflict(format!(
                "duplicate key: email \"{email}\""
            )));
        }
    }
    Ok(())
}

fn collect(users: &[StoredUser], keep: impl Fn(&User) -> bool) -> Vec<User> {
    users
        .iter()
        .map(|s| &s.user)
        .filter(|u| keep(u))
        .cloned()
        .collect()
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(collect(&self.users.read().await, |_| true))
    }

    async fn list_active(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(collect(&self.users.read().await, |u| u.active))
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|s| &s.user.id == id)
            .map(|s| s.user.clone()))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|s| s.user.username == username)
            .map(|s| s.user.clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|s| s.user.email.as_str() == email)
            .map(|s| s.user.clone()))
    }

    async fn search_by_first_name(&self, fragment: &str) -> Result<Vec<User>, RepositoryError> {
        let needle = fragment.to_lowercase();
        Ok(collect(&self.users.read().await, |u| {
            u.first_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        }))
    }

    async fn count_by_active(&self, active: bool) -> Result<u64, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|s| s.user.active == active).count() as u64)
    }

    async fn insert(
        &self,
        record: NewUserRecord,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        check_unique(&users, &record.username, record.email.as_str(), None)?;

        let user = User {
            id: UserId::from(ObjectId::new()),
            username: record.username,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            active: record.active,
            created_at: now,
            updated_at: now,
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: record.password_hash,
        });
        Ok(user)
    }

    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if !users.iter().any(|s| &s.user.id == id) {
            return Err(RepositoryError::NotFound);
        }
        check_unique(&users, &changes.username, changes.email.as_str(), Some(id))?;

        let stored = users
            .iter_mut()
            .find(|s| &s.user.id == id)
            .ok_or(RepositoryError::NotFound)?;

        stored.user.username = changes.username;
        stored.user.email = changes.email;
        stored.user.first_name = changes.first_name;
        stored.user.last_name = changes.last_name;
        stored.user.active = changes.active;
        stored.user.updated_at = now;
        if let Some(hash) = changes.password_hash {
            stored.password_hash = hash;
        }
        Ok(stored.user.clone())
    }

    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        let stored = users
            .iter_mut()
            .find(|s| &s.user.id == id)
            .ok_or(RepositoryError::NotFound)?;

        stored.user.active = active;
        stored.user.updated_at = now;
        Ok(stored.user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|s| &s.user.id != id);
        if users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fullstack_core::Email;

    use super::*;

    fn record(username: &str, email: &str) -> NewUserRecord {
        NewUserRecord {
            username: username.to_owned(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_owned(),
            first_name: None,
            last_name: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let store = MemoryUserStore::new();
        store.insert(record("admin", "admin@x.io"), Utc::now()).await.unwrap();

        let dup_name = store.insert(record("admin", "other@x.io"), Utc::now()).await;
        assert!(matches!(dup_name, Err(RepositoryError::Conflict(_))));

        let dup_email = store.insert(record("other", "admin@x.io"), Utc::now()).await;
        assert!(matches!(dup_email, Err(RepositoryError::Conflict(_))));

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_may_keep_own_username() {
        let store = MemoryUserStore::new();
        let user = store.insert(record("admin", "admin@x.io"), Utc::now()).await.unwrap();
        store.insert(record("other", "other@x.io"), Utc::now()).await.unwrap();

        let changes = |username: &str, email: &str| UserChanges {
            username: username.to_owned(),
            email: Email::parse(email).unwrap(),
            first_name: Some("Ada".into()),
            last_name: None,
            active: false,
            password_hash: None,
        };

        let updated = store
            .update(&user.id, changes("admin", "admin@x.io"), Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert!(!updated.active);
        assert_eq!(store.password_hash(&user.id).await.as_deref(), Some("hash"));

        let clash = store
            .update(&user.id, changes("other", "admin@x.io"), Utc::now())
            .await;
        assert!(matches!(clash, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = MemoryUserStore::new();
        let id = UserId::new("not-an-object-id");

        assert!(store.get(&id).await.unwrap().is_none());
        assert!(matches!(store.delete(&id).await, Err(RepositoryError::NotFound)));
        assert!(matches!(
            store.set_active(&id, true, Utc::now()).await,
            Err(RepositoryError::NotFound)
        ));
    }
}

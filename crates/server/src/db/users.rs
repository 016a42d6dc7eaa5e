//! `MongoDB`-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use fullstack_core::{Email, User, UserId};

use super::{NewUserRecord, RepositoryError, USERS, UserChanges, UserStore};

/// A document in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub active: bool,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

pub(crate) fn to_bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn to_chrono(at: bson::DateTime) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis()).ok_or_else(|| {
        RepositoryError::DataCorruption(format!("timestamp out of range: {at}"))
    })
}

impl TryFrom<UserDocument> for User {
    type Error = RepositoryError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| RepositoryError::DataCorruption("user document without _id".into()))?;
        let email = Email::parse(&doc.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::from(id),
            username: doc.username,
            email,
            first_name: doc.first_name,
            last_name: doc.last_name,
            active: doc.active,
            created_at: to_chrono(doc.created_at)?,
            updated_at: to_chrono(doc.updated_at)?,
        })
    }
}

/// Repository for the `users` collection.
#[derive(Debug, Clone)]
pub struct MongoUserStore {
    db: Database,
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Create a new user repository on `db`.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            users: db.collection(USERS),
        }
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<User>, RepositoryError> {
        let docs: Vec<UserDocument> = self.users.find(filter).await?.try_collect().await?;
        docs.into_iter().map(User::try_from).collect()
    }

    async fn find_single(&self, filter: Document) -> Result<Option<User>, RepositoryError> {
        self.users
            .find_one(filter)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Apply `update` to the user with `id` and return the new version.
    async fn modify(&self, id: &UserId, update: Document) -> Result<User, RepositoryError> {
        let oid = id.to_object_id().ok_or(RepositoryError::NotFound)?;

        let updated = self
            .users
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(RepositoryError::from_write)?;

        updated.ok_or(RepositoryError::NotFound)?.try_into()
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.find_many(doc! {}).await
    }

    async fn list_active(&self) -> Result<Vec<User>, RepositoryError> {
        self.find_many(doc! { "active": true }).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let Some(oid) = id.to_object_id() else {
            return Ok(None);
        };
        self.find_single(doc! { "_id": oid }).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.find_single(doc! { "username": username }).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.find_single(doc! { "email": email }).await
    }

    async fn search_by_first_name(&self, fragment: &str) -> Result<Vec<User>, RepositoryError> {
        self.find_many(doc! {
            "firstName": { "$regex": regex::escape(fragment), "$options": "i" }
        })
        .await
    }

    async fn count_by_active(&self, active: bool) -> Result<u64, RepositoryError> {
        Ok(self.users.count_documents(doc! { "active": active }).await?)
    }

    async fn insert(
        &self,
        record: NewUserRecord,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut doc = UserDocument {
            id: None,
            username: record.username,
            email: record.email.into_inner(),
            password: record.password_hash,
            first_name: record.first_name,
            last_name: record.last_name,
            active: record.active,
            created_at: to_bson_date(now),
            updated_at: to_bson_date(now),
        };

        let result = self
            .users
            .insert_one(&doc)
            .await
            .map_err(RepositoryError::from_write)?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption("inserted _id is not an ObjectId".into())
        })?;
        doc.id = Some(id);
        doc.try_into()
    }

    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let mut set = doc! {
            "username": changes.username,
            "email": changes.email.into_inner(),
            "active": changes.active,
            "updatedAt": to_bson_date(now),
        };
        let mut unset = Document::new();

        for (field, value) in [
            ("firstName", changes.first_name),
            ("lastName", changes.last_name),
        ] {
            match value {
                Some(value) => set.insert(field, value),
                None => unset.insert(field, ""),
            };
        }
        if let Some(hash) = changes.password_hash {
            set.insert("password", hash);
        }

        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }

        self.modify(id, update).await
    }

    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let update = doc! { "$set": { "active": active, "updatedAt": to_bson_date(now) } };
        self.modify(id, update).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), RepositoryError> {
        let oid = id.to_object_id().ok_or(RepositoryError::NotFound)?;
        let result = self.users.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn document() -> UserDocument {
        UserDocument {
            id: Some(ObjectId::new()),
            username: "admin".into(),
            email: "admin@fullstack.local".into(),
            password: "$2a$10$N9qo8uLOickgx2ZMRZoMye".into(),
            first_name: Some("Admin".into()),
            last_name: None,
            active: true,
            created_at: bson::DateTime::from_millis(1_700_000_000_000),
            updated_at: bson::DateTime::from_millis(1_700_000_000_000),
        }
    }

    #[test]
    fn test_document_to_user() {
        let doc = document();
        let oid = doc.id.unwrap();
        let user = User::try_from(doc).unwrap();

        assert_eq!(user.id.as_str(), oid.to_hex());
        assert_eq!(user.email.as_str(), "admin@fullstack.local");
        assert_eq!(user.created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_document_without_id_is_corrupt() {
        let doc = UserDocument {
            id: None,
            ..document()
        };
        assert!(matches!(
            User::try_from(doc),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_document_with_bad_email_is_corrupt() {
        let doc = UserDocument {
            email: "not an email".into(),
            ..document()
        };
        assert!(matches!(
            User::try_from(doc),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_document_serialization_omits_missing_names() {
        let bson = bson::to_document(&UserDocument {
            id: None,
            ..document()
        })
        .unwrap();

        assert!(bson.contains_key("firstName"));
        assert!(!bson.contains_key("lastName"));
        assert!(!bson.contains_key("_id"));
        assert!(bson.get_datetime("createdAt").is_ok());
    }
}

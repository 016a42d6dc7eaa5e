//! Collection validators and indexes.

use mongodb::bson::{Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

use fullstack_core::types::email::EMAIL_PATTERN;
use fullstack_core::validation::{
    NAME_MAX_LENGTH, PASSWORD_MIN_LENGTH, PRODUCT_DESCRIPTION_MAX_LENGTH,
    PRODUCT_NAME_MAX_LENGTH, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
};

use super::{PRODUCTS, USERS};

/// Server error code for "collection already exists".
const NAMESPACE_EXISTS: i32 = 48;

#[allow(clippy::cast_possible_wrap)]
const fn bound(n: usize) -> i64 {
    n as i64
}

/// `$jsonSchema` validator for `users`.
#[must_use]
pub fn users_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["username", "email", "password"],
            "properties": {
                "username": {
                    "bsonType": "string",
                    "minLength": bound(USERNAME_MIN_LENGTH),
                    "maxLength": bound(USERNAME_MAX_LENGTH),
                    "description": "Username must be a string between 3 and 50 characters",
                },
                "email": {
                    "bsonType": "string",
                    "pattern": EMAIL_PATTERN,
                    "description": "Email must be a valid email address",
                },
                "password": {
                    "bsonType": "string",
                    "minLength": bound(PASSWORD_MIN_LENGTH),
                    "description": "Password must be at least 6 characters",
                },
                "firstName": {
                    "bsonType": "string",
                    "maxLength": bound(NAME_MAX_LENGTH),
                    "description": "First name must not exceed 100 characters",
                },
                "lastName": {
                    "bsonType": "string",
                    "maxLength": bound(NAME_MAX_LENGTH),
                    "description": "Last name must not exceed 100 characters",
                },
                "active": { "bsonType": "bool", "description": "Active status must be a boolean" },
                "createdAt": { "bsonType": "date", "description": "Creation timestamp" },
                "updatedAt": { "bsonType": "date", "description": "Last update timestamp" },
            },
        }
    }
}

/// `$jsonSchema` validator for `products`.
#[must_use]
pub fn products_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["name", "price"],
            "properties": {
                "name": {
                    "bsonType": "string",
                    "minLength": 1_i64,
                    "maxLength": bound(PRODUCT_NAME_MAX_LENGTH),
                    "description": "Product name is required",
                },
                "description": {
                    "bsonType": "string",
                    "maxLength": bound(PRODUCT_DESCRIPTION_MAX_LENGTH),
                    "description": "Product description",
                },
                "price": {
                    "bsonType": "decimal",
                    "minimum": 0_i64,
                    "description": "Price must be a positive number",
                },
                "category": { "bsonType": "string", "description": "Product category" },
                "inStock": { "bsonType": "bool", "description": "Stock availability" },
                "tags": {
                    "bsonType": "array",
                    "items": { "bsonType": "string" },
                    "description": "Product tags",
                },
            },
        }
    }
}

fn unique(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn plain(keys: Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

/// Indexes on `users`: unique username and email, plus lookups by status
/// and creation time.
#[must_use]
pub fn user_indexes() -> Vec<IndexModel> {
    vec![
        unique(doc! { "username": 1 }),
        unique(doc! { "email": 1 }),
        plain(doc! { "active": 1 }),
        plain(doc! { "createdAt": 1 }),
    ]
}

/// Indexes on `products`: full-text over name and description, plus
/// category and price.
#[must_use]
pub fn product_indexes() -> Vec<IndexModel> {
    vec![
        plain(doc! { "name": "text", "description": "text" }),
        plain(doc! { "category": 1 }),
        plain(doc! { "price": 1 }),
    ]
}

/// Create both collections with their validators, returning how many were
/// new.
///
/// A collection that already exists is left as it is, validator included.
///
/// # Errors
///
/// Returns the driver error from the first failing command.
pub async fn create_collections(db: &Database) -> Result<usize, mongodb::error::Error> {
    let mut created = 0;
    for (name, validator) in [
        (USERS, users_validator()),
        (PRODUCTS, products_validator()),
    ] {
        if create_collection(db, name, validator).await? {
            created += 1;
        }
    }
    Ok(created)
}

async fn create_collection(
    db: &Database,
    name: &str,
    validator: Document,
) -> Result<bool, mongodb::error::Error> {
    match db.create_collection(name).validator(validator).await {
        Ok(()) => Ok(true),
        Err(err) if is_namespace_exists(&err) => {
            tracing::info!(collection = name, "Collection already exists");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

fn is_namespace_exists(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(e) if e.code == NAMESPACE_EXISTS)
}

/// Create every index on both collections, returning how many were built.
///
/// # Errors
///
/// Returns the driver error from the first failing command.
pub async fn create_indexes(db: &Database) -> Result<usize, mongodb::error::Error> {
    let users = db
        .collection::<Document>(USERS)
        .create_indexes(user_indexes())
        .await?;
    let products = db
        .collection::<Document>(PRODUCTS)
        .create_indexes(product_indexes())
        .await?;
    Ok(users.index_names.len() + products.index_names.len())
}

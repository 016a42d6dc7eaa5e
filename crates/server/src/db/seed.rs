//! Database bootstrap: collections, validators, indexes and sample data.
//!
//! The seed is meant to run once against an empty database. Existing
//! collections and indexes are accepted, but sample documents are never
//! upserted or skipped, so a second run fails on the unique `username` /
//! `email` index ([`SeedError::AlreadySeeded`]).

use chrono::{DateTime, Utc};
use mongodb::Database;
use mongodb::bson::{self, Decimal128};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fullstack_core::{Product, ValidationErrors};

use super::users::{UserDocument, to_bson_date};
use super::{PRODUCTS, USERS, is_duplicate_key, schema};

/// Password hash shared by every sample user.
pub const SAMPLE_PASSWORD_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMye";

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A sample document collides with existing data.
    #[error("database already seeded: {0}")]
    AlreadySeeded(String),

    /// Any other driver failure.
    #[error("database error: {0}")]
    Database(mongodb::error::Error),

    /// A built-in sample product is invalid.
    #[error("invalid sample product: {0}")]
    InvalidSample(String),
}

impl From<mongodb::error::Error> for SeedError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            Self::AlreadySeeded(err.to_string())
        } else {
            Self::Database(err)
        }
    }
}

impl From<ValidationErrors> for SeedError {
    fn from(err: ValidationErrors) -> Self {
        Self::InvalidSample(err.to_string())
    }
}

/// What a seed run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub collections_created: usize,
    pub indexes_created: usize,
    pub users_inserted: usize,
    pub products_inserted: usize,
}

/// A document in the `products` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    price: Decimal128,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_stock: Option<bool>,
    tags: Vec<String>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl ProductDocument {
    fn new(product: Product, now: DateTime<Utc>) -> Result<Self, SeedError> {
        product.validate()?;

        // Stored as a BSON decimal so the `bsonType: decimal` validator holds.
        let price = product
            .price
            .to_string()
            .parse::<Decimal128>()
            .map_err(|e| SeedError::InvalidSample(format!("price {}: {e}", product.price)))?;

        Ok(Self {
            name: product.name,
            description: product.description,
            price,
            category: product.category,
            in_stock: product.in_stock,
            tags: product.tags,
            created_at: to_bson_date(now),
            updated_at: to_bson_date(now),
        })
    }
}

fn sample_user(
    username: &str,
    email: &str,
    first_name: &str,
    active: bool,
    now: DateTime<Utc>,
) -> UserDocument {
    UserDocument {
        id: None,
        username: username.to_owned(),
        email: email.to_owned(),
        password: SAMPLE_PASSWORD_HASH.to_owned(),
        first_name: Some(first_name.to_owned()),
        last_name: Some("User".to_owned()),
        active,
        created_at: to_bson_date(now),
        updated_at: to_bson_date(now),
    }
}

/// The three sample users. `demo` is inactive.
pub(crate) fn sample_users(now: DateTime<Utc>) -> Vec<UserDocument> {
    vec![
        sample_user("admin", "admin@fullstack.local", "Admin", true, now),
        sample_user("testuser", "test@fullstack.local", "Test", true, now),
        sample_user("demo", "demo@fullstack.local", "Demo", false, now),
    ]
}

/// The two sample products.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    let tags = |t: [&str; 3]| -> Vec<String> { t.iter().map(|s| (*s).to_owned()).collect() };

    vec![
        Product {
            name: "Laptop Computer".to_owned(),
            description: Some("High-performance laptop for developers".to_owned()),
            price: Decimal::new(129_999, 2),
            category: Some("Electronics".to_owned()),
            in_stock: Some(true),
            tags: tags(["computer", "laptop", "technology"]),
        },
        Product {
            name: "Coffee Mug".to_owned(),
            description: Some("Ceramic coffee mug with company logo".to_owned()),
            price: Decimal::new(1_299, 2),
            category: Some("Accessories".to_owned()),
            in_stock: Some(true),
            tags: tags(["mug", "coffee", "ceramic"]),
        },
    ]
}

/// Create the schema and insert the sample data.
///
/// # Errors
///
/// Returns `SeedError::AlreadySeeded` if a sample user already exists and
/// `SeedError::Database` for every other store failure.
#[tracing::instrument(skip(db), fields(database = %db.name()))]
pub async fn seed(db: &Database) -> Result<SeedReport, SeedError> {
    let now = Utc::now();

    let collections_created = schema::create_collections(db).await?;
    tracing::info!(collections_created, "Collections created");

    let indexes_created = schema::create_indexes(db).await?;
    tracing::info!(indexes_created, "Indexes created");

    let users = db
        .collection::<UserDocument>(USERS)
        .insert_many(sample_users(now))
        .await?;

    let products = sample_products()
        .into_iter()
        .map(|p| ProductDocument::new(p, now))
        .collect::<Result<Vec<_>, _>>()?;
    let products = db
        .collection::<ProductDocument>(PRODUCTS)
        .insert_many(products)
        .await?;

    let report = SeedReport {
        collections_created,
        indexes_created,
        users_inserted: users.inserted_ids.len(),
        products_inserted: products.inserted_ids.len(),
    };
    tracing::info!(?report, "Database seeded");
    Ok(report)
}

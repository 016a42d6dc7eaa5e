//! Bootstrap the `MongoDB` database.
//!
//! Creates the `users` and `products` collections with their validators and
//! indexes, then inserts the sample users and products. Run it once against
//! an empty database; a second run fails instead of duplicating data.

use secrecy::SecretString;
use tracing::info;

use fullstack_server::config::{DEFAULT_DATABASE, DatabaseConfig};
use fullstack_server::db::{self, seed};

use super::print_json;

/// Seed the database.
///
/// # Arguments
///
/// * `uri` - Connection string; falls back to `MONGODB_URI` / `DATABASE_URL`
/// * `database` - Database name; falls back to `MONGODB_DATABASE`, then
///   `fullstack_dev`
///
/// # Errors
///
/// Returns an error if no connection string is configured, the server is
/// unreachable, or the database was already seeded.
pub async fn run(
    uri: Option<String>,
    database: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match uri {
        Some(uri) => {
            dotenvy::dotenv().ok();
            DatabaseConfig {
                uri: SecretString::from(uri),
                name: std::env::var("MONGODB_DATABASE")
                    .unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            }
        }
        None => DatabaseConfig::from_env()?,
    };
    if let Some(name) = database {
        config.name = name;
    }

    info!(database = %config.name, "Connecting to MongoDB");
    let db = db::connect(&config).await?;

    let report = seed::seed(&db).await?;
    info!(
        users = report.users_inserted,
        products = report.products_inserted,
        "Database initialized successfully"
    );

    print_json(&report)?;
    Ok(())
}

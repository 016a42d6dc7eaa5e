//! Integration tests for the Full Stack Toolkit.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no external services)
//! cargo test -p fullstack-integration-tests
//!
//! # Tests against MongoDB and a running server
//! docker run -d -p 27017:27017 mongo:7
//! cargo run -p fullstack-server &
//! cargo test -p fullstack-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `dashboard_roundtrip` - Client against an in-process server on the memory store
//! - `seed` - Database bootstrap against a real `MongoDB` (ignored)
//! - `users_api` - REST client against a running server (ignored)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use fullstack_server::db::MemoryUserStore;
use fullstack_server::routes;
use fullstack_server::state::AppState;

/// `MongoDB` connection string (configurable via environment).
#[must_use]
pub fn mongodb_uri() -> String {
    std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

/// Base URL of a running server (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("FULLSTACK_API_URL").unwrap_or_else(|_| "http://localhost:8080/api".to_string())
}

/// A name unlikely to collide with earlier runs, e.g. `it_1718000000123456`.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or_default();
    format!("{prefix}_{nanos}")
}

/// Serve the API over the in-memory store on an ephemeral port.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub async fn spawn_memory_server() -> std::io::Result<SocketAddr> {
    let app = routes::app(AppState::new(Arc::new(MemoryUserStore::new())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Test server stopped");
        }
    });

    Ok(addr)
}

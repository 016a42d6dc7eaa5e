//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (pings MongoDB)
//!
//! # Users
//! POST   /api/users                       - Create (201, 400 on invalid or duplicate)
//! GET    /api/users                       - List all
//! GET    /api/users/active                - List active
//! GET    /api/users/search?firstName=     - First name contains, case-insensitive
//! GET    /api/users/count?active=         - Count by status
//! GET    /api/users/username/{username}   - Lookup by username
//! GET    /api/users/email/{email}         - Lookup by email
//! GET    /api/users/{id}                  - Lookup by id
//! PUT    /api/users/{id}                  - Replace (409 on duplicate)
//! DELETE /api/users/{id}                  - Delete (204)
//! PATCH  /api/users/{id}/activate         - Set active
//! PATCH  /api/users/{id}/deactivate       - Clear active
//! ```

pub mod health;
pub mod users;

use axum::{
    Router,
    routing::{get, patch},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the `/api/users` router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/active", get(users::active))
        .route("/search", get(users::search))
        .route("/count", get(users::count))
        .route("/username/{username}", get(users::by_username))
        .route("/email/{email}", get(users::by_email))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::delete),
        )
        .route("/{id}/activate", patch(users::activate))
        .route("/{id}/deactivate", patch(users::deactivate))
}

/// Build the full application router.
///
/// Any origin may call the API.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/users", user_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryUserStore;

    fn test_app() -> Router {
        app(AppState::new(Arc::new(MemoryUserStore::new())))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn create(app: &Router, username: &str, first_name: &str, active: bool) -> Value {
        let (status, user) = send(
            app,
            "POST",
            "/api/users",
            Some(json!({
                "username": username,
                "email": format!("{username}@fullstack.local"),
                "firstName": first_name,
                "active": active,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{user}");
        user
    }

    fn id_of(user: &Value) -> String {
        user["id"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn test_create_hides_password() {
        let app = test_app();
        let (status, user) = send(
            &app,
            "POST",
            "/api/users",
            Some(json!({
                "username": "jdoe",
                "email": "jdoe@example.com",
                "password": "s3cret!",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["username"], "jdoe");
        assert_eq!(user["active"], true);
        assert_eq!(id_of(&user).len(), 24);
        assert!(user.get("password").is_none());
        assert!(user.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_invalid_bodies() {
        let app = test_app();
        create(&app, "admin", "Admin", true).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/users",
            Some(json!({ "username": "admin", "email": "other@fullstack.local" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Username already exists");

        let (status, _) = send(
            &app,
            "POST",
            "/api/users",
            Some(json!({ "username": "ab", "email": "bad" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/api/users", Some(json!({ "username": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lookups() {
        let app = test_app();
        let user = create(&app, "admin", "Admin", true).await;
        let id = id_of(&user);

        let (status, found) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, user);

        let (status, found) = send(&app, "GET", "/api/users/username/admin", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["id"], user["id"]);

        let (status, _) = send(&app, "GET", "/api/users/email/admin%40fullstack.local", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/api/users/username/nobody", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let app = test_app();
        for id in ["65a1f0c2e4b0a1b2c3d4e5f6", "not-an-id"] {
            let (status, _) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{id}");

            let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{id}");

            let (status, _) =
                send(&app, "PATCH", &format!("/api/users/{id}/activate"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{id}");
        }
    }

    #[tokio::test]
    async fn test_list_active_search_and_count() {
        let app = test_app();
        create(&app, "admin", "Admin", true).await;
        create(&app, "testuser", "Test", true).await;
        create(&app, "demo", "Demo", false).await;

        let (_, all) = send(&app, "GET", "/api/users", None).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, active) = send(&app, "GET", "/api/users/active", None).await;
        assert_eq!(active.as_array().unwrap().len(), 2);

        let (status, found) = send(&app, "GET", "/api/users/search?firstName=DM", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = found
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["admin"]);

        let (status, count) = send(&app, "GET", "/api/users/count?active=true", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(count, 2);

        let (_, count) = send(&app, "GET", "/api/users/count?active=false", None).await;
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_count_requires_boolean() {
        let app = test_app();
        let (status, _) = send(&app, "GET", "/api/users/count", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/users/count?active=maybe", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update() {
        let app = test_app();
        let user = create(&app, "admin", "Admin", true).await;
        create(&app, "other", "Other", true).await;
        let uri = format!("/api/users/{}", id_of(&user));

        let (status, updated) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({
                "username": "root",
                "email": "root@fullstack.local",
                "lastName": "User",
                "active": false,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["username"], "root");
        assert_eq!(updated["lastName"], "User");
        assert!(updated.get("firstName").is_none());
        assert_eq!(updated["active"], false);
        assert_eq!(updated["createdAt"], user["createdAt"]);

        let (status, _) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({ "username": "other", "email": "root@fullstack.local" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({ "username": "root", "email": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "PUT",
            "/api/users/65a1f0c2e4b0a1b2c3d4e5f6",
            Some(json!({ "username": "ghost", "email": "ghost@fullstack.local" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_and_toggle() {
        let app = test_app();
        let user = create(&app, "admin", "Admin", true).await;
        let id = id_of(&user);

        let (status, body) = send(&app, "PATCH", &format!("/api/users/{id}/deactivate"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"], false);

        let (status, body) = send(&app, "PATCH", &format!("/api/users/{id}/activate"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"], true);

        let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_and_cors() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");

        let (status, _) = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::builder()
            .uri("/api/users")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}

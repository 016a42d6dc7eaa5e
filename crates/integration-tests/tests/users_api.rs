//! REST client against a running server.
//!
//! These tests require:
//! - A running `MongoDB`
//! - The server running (cargo run -p fullstack-server)
//!
//! Run with: cargo test -p fullstack-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::StatusCode;

use fullstack_client::{ClientConfig, UserApi, UserService};
use fullstack_core::UserDraft;
use fullstack_integration_tests::{api_base_url, unique_name};

fn service() -> UserService {
    let config = ClientConfig::new(&api_base_url()).expect("valid FULLSTACK_API_URL");
    UserService::new(&config).expect("HTTP client")
}

#[tokio::test]
#[ignore = "requires a running server and MongoDB"]
async fn test_user_lifecycle() {
    let api = service();
    let username = unique_name("it");
    let email = format!("{username}@fullstack.local");

    let created = api
        .create_user(&UserDraft::new(username.clone(), email.clone()))
        .await
        .expect("create");
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.data.id;

    let by_email = api.get_user_by_email(&email).await.expect("by email");
    assert_eq!(by_email.data.username, username);

    let duplicate = api
        .create_user(&UserDraft::new(username.clone(), "other@fullstack.local"))
        .await
        .unwrap_err();
    assert_eq!(duplicate.status(), Some(StatusCode::BAD_REQUEST));

    let deactivated = api.deactivate_user(&id).await.expect("deactivate");
    assert!(!deactivated.data.active);

    api.delete_user(&id).await.expect("delete");
    let gone = api.get_user(&id).await.unwrap_err();
    assert_eq!(gone.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
#[ignore = "requires a running server and MongoDB"]
async fn test_malformed_id_is_not_found() {
    let err = service()
        .get_user(&"not-an-object-id".into())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

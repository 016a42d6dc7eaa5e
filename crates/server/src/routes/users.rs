//! User REST handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use fullstack_core::{User, UserDraft, UserId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `?firstName=` for search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub first_name: String,
}

/// `?active=` for count.
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub active: bool,
}

/// Unwrap a JSON body, answering malformed input with 400.
fn draft_body(body: std::result::Result<Json<UserDraft>, JsonRejection>) -> Result<UserDraft> {
    body.map(|Json(draft)| draft)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn found(user: Option<User>) -> Result<Json<User>> {
    user.map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Create a user. Duplicates are a 400 here, not a 409.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<UserDraft>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let draft = draft_body(body)?;
    let user = state
        .users()
        .create_user(draft)
        .await
        .map_err(|e| AppError::from(e).conflict_as_bad_request())?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users().list_users().await?))
}

pub async fn active(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users().active_users().await?))
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<User>> {
    found(state.users().get_user(&UserId::new(id)).await?)
}

#[instrument(skip(state))]
pub async fn by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>> {
    found(state.users().get_user_by_username(&username).await?)
}

#[instrument(skip(state))]
pub async fn by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>> {
    found(state.users().get_user_by_email(&email).await?)
}

/// Case-insensitive "first name contains".
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>> {
    Ok(Json(
        state.users().search_by_first_name(&query.first_name).await?,
    ))
}

pub async fn count(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Result<Json<u64>> {
    Ok(Json(state.users().count_by_active(query.active).await?))
}

#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UserDraft>, JsonRejection>,
) -> Result<Json<User>> {
    let draft = draft_body(body)?;
    let user = state.users().update_user(&UserId::new(id), draft).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.users().delete_user(&UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    Ok(Json(state.users().activate_user(&UserId::new(id)).await?))
}

#[instrument(skip(state))]
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    Ok(Json(state.users().deactivate_user(&UserId::new(id)).await?))
}

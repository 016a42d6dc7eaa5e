//! User API client.
//!
//! One method per REST action under `{base_url}/users`. Each method issues
//! exactly one request and hands back the decoded body with its status.
//! Nothing is retried, cached or coalesced, and errors are passed through
//! as they come from `reqwest`.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;

use fullstack_core::{User, UserDraft, UserId};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// A successful response: status plus decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    /// HTTP status (always 2xx).
    pub status: StatusCode,
    /// Decoded JSON body.
    pub data: T,
}

/// The user REST API, one method per action.
///
/// [`UserService`] is the HTTP implementation; the dashboard is generic over
/// this trait so it can run against anything that speaks the same contract.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /users`
    async fn list_users(&self) -> Result<ApiResponse<Vec<User>>, ClientError>;

    /// `GET /users/{id}`
    async fn get_user(&self, id: &UserId) -> Result<ApiResponse<User>, ClientError>;

    /// `GET /users/username/{username}`
    async fn get_user_by_username(&self, username: &str)
    -> Result<ApiResponse<User>, ClientError>;

    /// `GET /users/email/{email}`
    async fn get_user_by_email(&self, email: &str) -> Result<ApiResponse<User>, ClientError>;

    /// `POST /users`
    async fn create_user(&self, draft: &UserDraft) -> Result<ApiResponse<User>, ClientError>;

    /// `PUT /users/{id}`
    async fn update_user(
        &self,
        id: &UserId,
        draft: &UserDraft,
    ) -> Result<ApiResponse<User>, ClientError>;

    /// `DELETE /users/{id}`
    async fn delete_user(&self, id: &UserId) -> Result<ApiResponse<()>, ClientError>;

    /// `PATCH /users/{id}/activate`
    async fn activate_user(&self, id: &UserId) -> Result<ApiResponse<User>, ClientError>;

    /// `PATCH /users/{id}/deactivate`
    async fn deactivate_user(&self, id: &UserId) -> Result<ApiResponse<User>, ClientError>;

    /// `GET /users/search?firstName=`
    async fn search_users(&self, first_name: &str)
    -> Result<ApiResponse<Vec<User>>, ClientError>;

    /// `GET /users/count?active=`
    async fn count_users(&self, active: bool) -> Result<ApiResponse<u64>, ClientError>;
}

/// HTTP client for the user API.
#[derive(Debug, Clone)]
pub struct UserService {
    client: reqwest::Client,
    base_url: String,
}

impl UserService {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_owned(),
        })
    }

    /// Absolute URL of `path` under the users resource.
    fn url(&self, path: &str) -> String {
        format!("{}/users{path}", self.base_url)
    }

    /// Send the request and decode a JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = request.send().await?.error_for_status()?;
        let status = response.status();
        let data = response.json().await?;
        Ok(ApiResponse { status, data })
    }
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait]
impl UserApi for UserService {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<ApiResponse<Vec<User>>, ClientError> {
        self.fetch(self.client.get(self.url(""))).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_user(&self, id: &UserId) -> Result<ApiResponse<User>, ClientError> {
        let url = self.url(&format!("/{}", segment(id.as_str())));
        self.fetch(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<ApiResponse<User>, ClientError> {
        let url = self.url(&format!("/username/{}", segment(username)));
        self.fetch(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<ApiResponse<User>, ClientError> {
        let url = self.url(&format!("/email/{}", segment(email)));
        self.fetch(self.client.get(url)).await
    }

    #[instrument(skip(self, draft), fields(username = %draft.username))]
    async fn create_user(&self, draft: &UserDraft) -> Result<ApiResponse<User>, ClientError> {
        self.fetch(self.client.post(self.url("")).json(draft)).await
    }

    #[instrument(skip(self, draft), fields(id = %id))]
    async fn update_user(
        &self,
        id: &UserId,
        draft: &UserDraft,
    ) -> Result<ApiResponse<User>, ClientError> {
        let url = self.url(&format!("/{}", segment(id.as_str())));
        self.fetch(self.client.put(url).json(draft)).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_user(&self, id: &UserId) -> Result<ApiResponse<()>, ClientError> {
        let url = self.url(&format!("/{}", segment(id.as_str())));
        let response = self.client.delete(url).send().await?.error_for_status()?;
        Ok(ApiResponse {
            status: response.status(),
            data: (),
        })
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn activate_user(&self, id: &UserId) -> Result<ApiResponse<User>, ClientError> {
        let url = self.url(&format!("/{}/activate", segment(id.as_str())));
        self.fetch(self.client.patch(url)).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn deactivate_user(&self, id: &UserId) -> Result<ApiResponse<User>, ClientError> {
        let url = self.url(&format!("/{}/deactivate", segment(id.as_str())));
        self.fetch(self.client.patch(url)).await
    }

    #[instrument(skip(self))]
    async fn search_users(
        &self,
        first_name: &str,
    ) -> Result<ApiResponse<Vec<User>>, ClientError> {
        let request = self
            .client
            .get(self.url("/search"))
            .query(&[("firstName", first_name)]);
        self.fetch(request).await
    }

    #[instrument(skip(self))]
    async fn count_users(&self, active: bool) -> Result<ApiResponse<u64>, ClientError> {
        let request = self.client.get(self.url("/count")).query(&[("active", active)]);
        self.fetch(request).await
    }
}

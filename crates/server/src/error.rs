//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; client errors are not.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ServiceError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Request body broke a document rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique username or email already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Report a conflict as a plain bad request.
    ///
    /// `POST /api/users` answers duplicates with 400 rather than 409.
    #[must_use]
    pub fn conflict_as_bad_request(self) -> Self {
        match self {
            Self::Conflict(msg) => Self::BadRequest(msg),
            other => other,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => Self::Validation(errors.to_string()),
            ServiceError::UsernameTaken | ServiceError::EmailTaken => {
                Self::Conflict(err.to_string())
            }
            ServiceError::NotFound => Self::NotFound("User not found".to_string()),
            ServiceError::PasswordHash => Self::Internal(err.to_string()),
            ServiceError::Repository(RepositoryError::Conflict(_)) => {
                Self::Conflict("Username or email already exists".to_string())
            }
            ServiceError::Repository(RepositoryError::NotFound) => {
                Self::NotFound("User not found".to_string())
            }
            ServiceError::Repository(other) => Self::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::BadRequest(msg) => msg.clone(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        assert_eq!(
            get_status(ServiceError::UsernameTaken.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::from(ServiceError::EmailTaken).conflict_as_bad_request()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(ServiceError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(ServiceError::Repository(RepositoryError::Conflict("dup".into())).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(
                ServiceError::Repository(RepositoryError::DataCorruption("bad".into())).into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

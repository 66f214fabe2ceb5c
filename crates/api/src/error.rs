//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, ApiError>`.
//!
//! Status taxonomy: validation → 400, conflict → 409, auth → 401, not found
//! → 404, dependency and unexpected failures → 500 with no internal detail
//! leaked to the client. Nothing is retried automatically.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::business::BusinessError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Business registry operation failed.
    #[error("business error: {0}")]
    Business(#[from] BusinessError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated (or not permitted).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from the client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error body sent to clients.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword
                | AuthError::MissingCredential => StatusCode::BAD_REQUEST,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::UserNotFound
                | AuthError::InvalidCredentials
                | AuthError::InvalidCode => StatusCode::UNAUTHORIZED,
                AuthError::PasswordHash
                | AuthError::Token(_)
                | AuthError::Email(_)
                | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Business(err) => match err {
                BusinessError::SlugTaken
                | BusinessError::CodeTaken
                | BusinessError::OwnerHasBusiness => StatusCode::CONFLICT,
                BusinessError::NotFound => StatusCode::NOT_FOUND,
                BusinessError::NotOwner => StatusCode::UNAUTHORIZED,
                BusinessError::SlugImmutable | BusinessError::InvalidReviewLink => {
                    StatusCode::BAD_REQUEST
                }
                BusinessError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal failures are collapsed to a generic
    /// message; details go to tracing/Sentry only.
    fn client_message(&self) -> String {
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            return "Internal server error".to_owned();
        }

        match self {
            Self::Auth(err) => err.to_string(),
            Self::Business(err) => err.to_string(),
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            ApiError::Auth(AuthError::UserAlreadyExists).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Auth(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::InvalidCode).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingCredential).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_business_error_status_codes() {
        assert_eq!(
            ApiError::Business(BusinessError::SlugTaken).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Business(BusinessError::NotOwner).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Business(BusinessError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_slug_change_is_a_client_error() {
        let err = ApiError::Business(BusinessError::SlugImmutable);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "slug cannot be changed");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::Internal("connection pool exhausted".to_owned());
        assert_eq!(err.client_message(), "Internal server error");

        let err = ApiError::Auth(AuthError::PasswordHash);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = ApiError::BadRequest("credential required".to_owned());
        assert_eq!(err.client_message(), "credential required");

        let err = ApiError::Auth(AuthError::InvalidCode);
        assert_eq!(err.client_message(), "invalid or expired code");
    }
}

//! Custom error types for the API service
//!
//! Maps the failure taxonomy onto HTTP statuses. Backing-store failures are
//! logged server-side and surfaced as an opaque 500; only conflicts keep
//! their identity so duplicate signups can be told apart from outages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field is missing or malformed
    #[error("validation error: {0}")]
    Validation(String),

    /// No credential was presented
    #[error("missing credentials")]
    Unauthorized,

    /// A credential was presented but is malformed, invalid, or expired
    #[error("invalid or expired credentials")]
    Forbidden,

    /// Login with an unknown email or wrong password
    #[error("wrong credentials")]
    InvalidCredentials,

    /// The requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated
    #[error("conflict: {0}")]
    Conflict(String),

    /// File ingest failed before reaching the backing store
    #[error("ingest error: {0}")]
    Ingest(String),

    /// Uploaded payload exceeds the configured limit
    #[error("payload too large")]
    PayloadTooLarge,

    /// Internal server error
    #[error("internal server error")]
    Internal,

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Missing credentials.".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Invalid or expired credentials.".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Email or Password are wrong.".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Ingest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large.".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.".to_string(),
            ),
            ApiError::Store(err) if err.is_conflict() => {
                (StatusCode::CONFLICT, "Duplicate entry.".to_string())
            }
            ApiError::Store(err) => {
                error!("backing store failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_store_errors_map_to_409() {
        let err = ApiError::Store(StoreError::Conflict("duplicate key".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_store_errors_map_to_opaque_500() {
        let err = ApiError::Store(StoreError::Backend("upstream exploded".to_string()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_failures_are_distinguishable() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}

//! Structured error handling for the REST API.
//!
//! Internal details are logged but never exposed to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application error type with automatic HTTP response conversion.
///
/// Internal details are logged but sanitized messages are sent to clients.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Create a not found error for an entity.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} not found: {id}"))
    }

    /// Create a conflict error for duplicate data.
    #[must_use]
    pub fn conflict(entity: &str, field: &str) -> Self {
        Self::Conflict(format!("{entity} with this {field} already exists"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(e) => {
                error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for the application.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_helper_formats_correctly() {
        let err = AppError::not_found("Speaker", "abc-123");
        assert!(err.to_string().contains("Speaker"));
        assert!(err.to_string().contains("abc-123"));
    }

    #[test]
    fn conflict_helper_formats_correctly() {
        let err = AppError::conflict("Speaker", "business email");
        assert!(err.to_string().contains("business email"));
    }

    #[test]
    fn response_status_maps_correctly() {
        let resp = AppError::NotFound("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::Unauthenticated("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = AppError::Conflict("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_are_sanitized() {
        let resp = AppError::Internal("connection string leaked".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

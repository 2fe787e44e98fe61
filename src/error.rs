//! Error types for the Transcript Annotator

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type for the reference annotation backend
pub type Result<T> = std::result::Result<T, AppError>;

/// Reference backend error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Rejected engine mutations
///
/// A validation error never changes engine state. Callers surface it as a
/// disabled control or an inline message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No active text selection")]
    EmptySelection,

    #[error("Comment body is empty")]
    EmptyBody,

    #[error("Annotator id is empty")]
    EmptyAnnotatorId,

    #[error("Enter and confirm an annotator id before annotating")]
    SessionNotLocked,

    #[error("Annotator session is already locked to {0}")]
    SessionAlreadyLocked(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Comment {0} belongs to another annotator")]
    NotAuthor(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let response = AppError::BadRequest("start_offset must be below end_offset".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::SessionAlreadyLocked("alice".into()).to_string(),
            "Annotator session is already locked to alice"
        );
        assert_eq!(ValidationError::EmptyBody.to_string(), "Comment body is empty");
    }
}

//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`EngineError`] variants to HTTP status codes and returns JSON
//! error bodies with a machine-readable code and a human-readable message.
//! Internal error details are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tutorhub_engine::EngineError;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "SCHEDULE_CONFLICT").
    pub code: String,
    /// Human-readable error message, naming the offending entity.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Referenced entity absent (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed or incomplete input (422). Caller error, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422). Normalized with `Validation`:
    /// syntactically valid HTTP carrying semantically invalid content.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Operation not legal in the entity's current status (409), e.g.
    /// approving a non-pending offering or joining a class twice.
    #[error("state error: {0}")]
    State(String),

    /// The operation would violate a scheduling invariant (409). The message
    /// names the conflicting class.
    #[error("schedule conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::State(_) => (StatusCode::CONFLICT, "STATE_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "SCHEDULE_CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => Self::Validation(msg),
            EngineError::NotFound(msg) => Self::NotFound(msg),
            EngineError::State(msg) => Self::State(msg),
            EngineError::Conflict(msg) => Self::Conflict(msg),
            EngineError::Store(err) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (
                AppError::BadRequest("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "BAD_REQUEST",
            ),
            (AppError::State("x".into()), StatusCode::CONFLICT, "STATE_ERROR"),
            (
                AppError::Conflict("x".into()),
                StatusCode::CONFLICT,
                "SCHEDULE_CONFLICT",
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, expected_status, expected_code) in cases {
            let (status, code) = err.status_and_code();
            assert_eq!(status, expected_status);
            assert_eq!(code, expected_code);
        }
    }

    #[test]
    fn engine_errors_map_onto_api_errors() {
        let conflict = EngineError::Conflict("room 'B4-303' is already booked for class 'cls-001'".into());
        match AppError::from(conflict) {
            AppError::Conflict(msg) => assert!(msg.contains("cls-001")),
            other => panic!("expected Conflict, got {other:?}"),
        }
        assert!(matches!(
            AppError::from(EngineError::State("double join".into())),
            AppError::State(_)
        ));
    }

    /// Helper to extract status and body from a response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_conflict_names_the_entity() {
        let (status, body) =
            response_parts(AppError::Conflict("schedule conflict with class 'cls-007'".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, "SCHEDULE_CONFLICT");
        assert!(body.error.message.contains("cls-007"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("failed to write collection data/x.json".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            !body.error.message.contains("data/x.json"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "An internal error occurred");
    }
}

//! # Request Extraction Helpers
//!
//! Request bodies implement [`Validate`]; handlers take
//! `Result<Json<T>, JsonRejection>` and run both the parse and the
//! validation through [`extract_validated_json`] so every malformed body
//! becomes a structured 422 instead of axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Structural validation of a request body, applied after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON extraction, mapping parse failures to `BadRequest` and
/// validation failures to `Validation`.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

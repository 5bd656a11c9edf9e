//! # Enrollment API
//!
//! Joining and leaving classes, plus the student-facing listings.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tutorhub_core::Enrollment;
use tutorhub_engine::{BrowseView, EnrolledClass};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to enroll a student in an approved class.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinClassRequest {
    pub student_id: String,
    pub class_id: String,
}

impl Validate for JoinClassRequest {
    fn validate(&self) -> Result<(), String> {
        if self.student_id.trim().is_empty() {
            return Err("student_id must not be empty".to_string());
        }
        if self.class_id.trim().is_empty() {
            return Err("class_id must not be empty".to_string());
        }
        Ok(())
    }
}

/// Optional filters for the browse listing.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub subject: Option<String>,
    pub tutor_id: Option<String>,
}

/// Build the students router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/enrollments", post(join_class))
        .route("/v1/enrollments/:class_id/:student_id", delete(leave_class))
        .route("/v1/students/:id/classes", get(enrolled_classes))
        .route("/v1/students/:id/browse", get(browse_classes))
}

/// POST /v1/enrollments — Enroll a student in an approved class.
#[utoipa::path(
    post,
    path = "/v1/enrollments",
    request_body = JoinClassRequest,
    responses(
        (status = 201, description = "Enrollment recorded", body = Enrollment),
        (status = 404, description = "Class not found", body = crate::error::ErrorBody),
        (status = 409, description = "Class not approved, repeat join, or schedule conflict", body = crate::error::ErrorBody),
    ),
    tag = "enrollments"
)]
pub(crate) async fn join_class(
    State(state): State<AppState>,
    body: Result<Json<JoinClassRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let req = extract_validated_json(body)?;
    let row = state.enrollment.join(&req.student_id, &req.class_id)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /v1/enrollments/:class_id/:student_id — Remove a student from a
/// class.
#[utoipa::path(
    delete,
    path = "/v1/enrollments/{class_id}/{student_id}",
    params(
        ("class_id" = String, Path, description = "Class id"),
        ("student_id" = String, Path, description = "Student id"),
    ),
    responses(
        (status = 204, description = "Enrollment removed"),
        (status = 404, description = "Student not enrolled", body = crate::error::ErrorBody),
    ),
    tag = "enrollments"
)]
pub(crate) async fn leave_class(
    State(state): State<AppState>,
    Path((class_id, student_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.enrollment.leave(&student_id, &class_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/students/:id/classes — The student's enrolled classes.
#[utoipa::path(
    get,
    path = "/v1/students/{id}/classes",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Enrolled classes ordered by class id", body = Vec<EnrolledClass>),
    ),
    tag = "enrollments"
)]
pub(crate) async fn enrolled_classes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<EnrolledClass>> {
    Json(state.enrollment.enrolled_classes(&id))
}

/// GET /v1/students/:id/browse — Approved classes the student can join,
/// grouped by subject then tutor.
#[utoipa::path(
    get,
    path = "/v1/students/{id}/browse",
    params(
        ("id" = String, Path, description = "Student id"),
        ("subject" = Option<String>, Query, description = "Case-insensitive subject filter"),
        ("tutor_id" = Option<String>, Query, description = "Tutor filter"),
    ),
    responses(
        (status = 200, description = "Joinable classes grouped by subject then tutor"),
    ),
    tag = "enrollments"
)]
pub(crate) async fn browse_classes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BrowseQuery>,
) -> Json<BrowseView> {
    Json(state.enrollment.browse(&id, query.subject.as_deref(), query.tutor_id.as_deref()))
}

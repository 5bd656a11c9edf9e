//! # Reports API
//!
//! Student evaluations and report queries. Tutor progress notes are written
//! through the offering progress route; this module exposes the read side.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tutorhub_core::Report;
use tutorhub_engine::ProgressNoteEntry;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// A student's evaluation of a class and its tutor.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddEvaluationRequest {
    pub class_id: String,
    pub tutor_id: String,
    pub student_id: String,
    pub content: String,
}

impl Validate for AddEvaluationRequest {
    fn validate(&self) -> Result<(), String> {
        if self.student_id.trim().is_empty() {
            return Err("student_id must not be empty".to_string());
        }
        Ok(())
    }
}

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/evaluations", post(add_evaluation))
        .route("/v1/classes/:id/reports", get(class_reports))
        .route("/v1/tutors/:id/reports", get(tutor_reports))
        .route("/v1/students/:id/reports", get(student_reports))
        .route("/v1/reports/evaluations", get(all_evaluations))
        .route("/v1/reports/progress-notes", get(all_progress_notes))
}

/// POST /v1/evaluations — File a student evaluation.
#[utoipa::path(
    post,
    path = "/v1/evaluations",
    request_body = AddEvaluationRequest,
    responses(
        (status = 201, description = "Evaluation filed", body = Report),
        (status = 404, description = "Class not found", body = crate::error::ErrorBody),
        (status = 422, description = "Empty content or tutor mismatch", body = crate::error::ErrorBody),
    ),
    tag = "reports"
)]
pub(crate) async fn add_evaluation(
    State(state): State<AppState>,
    body: Result<Json<AddEvaluationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    let req = extract_validated_json(body)?;
    let report = state.reports.add_student_evaluation(
        &req.class_id,
        &req.tutor_id,
        &req.student_id,
        &req.content,
    )?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /v1/classes/:id/reports — All reports for one class.
#[utoipa::path(
    get,
    path = "/v1/classes/{id}/reports",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "Reports ordered by date", body = Vec<Report>),
    ),
    tag = "reports"
)]
pub(crate) async fn class_reports(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Report>> {
    Json(state.reports.reports_for_class(&id))
}

/// GET /v1/tutors/:id/reports — All reports naming one tutor.
#[utoipa::path(
    get,
    path = "/v1/tutors/{id}/reports",
    params(("id" = String, Path, description = "Tutor id")),
    responses(
        (status = 200, description = "Reports ordered by date", body = Vec<Report>),
    ),
    tag = "reports"
)]
pub(crate) async fn tutor_reports(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Report>> {
    Json(state.reports.reports_for_tutor(&id))
}

/// GET /v1/students/:id/reports — All reports filed by one student.
#[utoipa::path(
    get,
    path = "/v1/students/{id}/reports",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Reports ordered by date", body = Vec<Report>),
    ),
    tag = "reports"
)]
pub(crate) async fn student_reports(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Report>> {
    Json(state.reports.reports_for_student(&id))
}

/// GET /v1/reports/evaluations — Every student evaluation (oversight view).
#[utoipa::path(
    get,
    path = "/v1/reports/evaluations",
    responses(
        (status = 200, description = "Evaluations ordered by date", body = Vec<Report>),
    ),
    tag = "reports"
)]
pub(crate) async fn all_evaluations(State(state): State<AppState>) -> Json<Vec<Report>> {
    Json(state.reports.student_evaluations())
}

/// GET /v1/reports/progress-notes — Every inline progress note across all
/// classes.
#[utoipa::path(
    get,
    path = "/v1/reports/progress-notes",
    responses(
        (status = 200, description = "Notes with class, tutor, and timestamp", body = Vec<ProgressNoteEntry>),
    ),
    tag = "reports"
)]
pub(crate) async fn all_progress_notes(State(state): State<AppState>) -> Json<Vec<ProgressNoteEntry>> {
    Json(state.reports.all_progress_notes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use tutorhub_core::{DeliveryMode, TimeSlot};
    use tutorhub_engine::OfferingDraft;

    fn test_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let state = AppState::open(dir.path()).unwrap();
        (dir, state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn propose(state: &AppState, tutor: &str) -> String {
        let day = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let timeslot = TimeSlot::new(
            day.and_hms_opt(9, 0, 0).unwrap(),
            day.and_hms_opt(10, 0, 0).unwrap(),
        )
        .unwrap();
        state
            .lifecycle
            .propose(OfferingDraft {
                tutor_id: tutor.into(),
                subject: "Mathematics".into(),
                timeslot,
                delivery_mode: DeliveryMode::Online,
                meeting_link: Some("https://meet.example/a".into()),
                room_hint: None,
            })
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn evaluation_returns_201_and_shows_up_in_queries() {
        let (_dir, state) = test_state();
        let class = propose(&state, "tut-1");
        let app = router().with_state(state);

        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/evaluations",
                &format!(
                    r#"{{"class_id": "{class}", "tutor_id": "tut-1", "student_id": "stu-1", "content": "clear explanations"}}"#
                ),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        for uri in [
            format!("/v1/classes/{class}/reports"),
            "/v1/tutors/tut-1/reports".to_string(),
            "/v1/students/stu-1/reports".to_string(),
            "/v1/reports/evaluations".to_string(),
        ] {
            let resp = app.clone().oneshot(get(&uri)).await.unwrap();
            let rows: Vec<serde_json::Value> = body_json(resp).await;
            assert_eq!(rows.len(), 1, "expected one report at {uri}");
            assert_eq!(rows[0]["type"], "student_evaluation");
        }
    }

    #[tokio::test]
    async fn evaluation_with_wrong_tutor_returns_422() {
        let (_dir, state) = test_state();
        let class = propose(&state, "tut-1");
        let app = router().with_state(state);

        let resp = app
            .oneshot(post_json(
                "/v1/evaluations",
                &format!(
                    r#"{{"class_id": "{class}", "tutor_id": "tut-2", "student_id": "stu-1", "content": "x"}}"#
                ),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn evaluation_for_missing_class_returns_404() {
        let (_dir, state) = test_state();
        let app = router().with_state(state);
        let resp = app
            .oneshot(post_json(
                "/v1/evaluations",
                r#"{"class_id": "cls-999", "tutor_id": "tut-1", "student_id": "stu-1", "content": "x"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn progress_notes_view_spans_classes() {
        let (_dir, state) = test_state();
        let class_a = propose(&state, "tut-1");
        let class_b = propose(&state, "tut-2");
        state.reports.record_tutor_progress(&class_a, "tut-1", "alpha").unwrap();
        state.reports.record_tutor_progress(&class_b, "tut-2", "beta").unwrap();
        let app = router().with_state(state);

        let resp = app.oneshot(get("/v1/reports/progress-notes")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let notes: Vec<serde_json::Value> = body_json(resp).await;
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().any(|n| n["class_id"] == class_a && n["content"] == "alpha"));
    }
}

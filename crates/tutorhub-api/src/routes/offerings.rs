//! # Offering Lifecycle API
//!
//! Proposal, approval, rejection, listings, progress notes, and the
//! coordinator's review views.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tutorhub_core::{ClassOffering, DeliveryMode, TimeSlot};
use tutorhub_engine::{OfferingDraft, OfferingFilter};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to propose a class offering.
///
/// `room` is accepted for wire compatibility but ignored: rooms are
/// coordinator-assigned at approval time.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProposeOfferingRequest {
    pub tutor_id: String,
    pub subject: String,
    pub timeslot: TimeSlot,
    pub delivery_mode: DeliveryMode,
    pub meeting_link: Option<String>,
    pub room: Option<String>,
}

impl Validate for ProposeOfferingRequest {
    fn validate(&self) -> Result<(), String> {
        if self.tutor_id.trim().is_empty() {
            return Err("tutor_id must not be empty".to_string());
        }
        if self.subject.trim().is_empty() {
            return Err("subject must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to approve an offering. `room_id` is required iff the offering
/// is offline.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveOfferingRequest {
    pub room_id: Option<String>,
}

impl Validate for ApproveOfferingRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Request to reject an offering. The reason is mandatory.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectOfferingRequest {
    pub reason: String,
}

impl Validate for RejectOfferingRequest {
    fn validate(&self) -> Result<(), String> {
        // Emptiness is checked by the lifecycle manager so the invariant
        // holds for every caller, not just this route.
        Ok(())
    }
}

/// Request to record a tutor progress note.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordProgressRequest {
    pub tutor_id: String,
    pub note: String,
}

impl Validate for RecordProgressRequest {
    fn validate(&self) -> Result<(), String> {
        if self.tutor_id.trim().is_empty() {
            return Err("tutor_id must not be empty".to_string());
        }
        Ok(())
    }
}

/// Timestamp the note was keyed under, minute resolution.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordProgressResponse {
    pub timestamp: String,
}

/// Status filter for offering listings.
#[derive(Debug, Deserialize, Default)]
pub struct ListOfferingsQuery {
    #[serde(default)]
    pub filter: OfferingFilter,
}

/// Build the offerings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/offerings", get(list_offerings).post(propose_offering))
        .route("/v1/offerings/review-queue", get(review_queue))
        .route("/v1/offerings/decided", get(decided_classes))
        .route("/v1/offerings/:id", get(get_offering))
        .route("/v1/offerings/:id/approve", post(approve_offering))
        .route("/v1/offerings/:id/reject", post(reject_offering))
        .route("/v1/offerings/:id/progress", post(record_progress))
        .route("/v1/coverage", get(subject_coverage))
}

/// POST /v1/offerings — Propose a class offering (tutor action).
#[utoipa::path(
    post,
    path = "/v1/offerings",
    request_body = ProposeOfferingRequest,
    responses(
        (status = 201, description = "Offering created in Pending status", body = ClassOffering),
        (status = 422, description = "Invalid proposal", body = crate::error::ErrorBody),
    ),
    tag = "offerings"
)]
pub(crate) async fn propose_offering(
    State(state): State<AppState>,
    body: Result<Json<ProposeOfferingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClassOffering>), AppError> {
    let req = extract_validated_json(body)?;
    let offering = state.lifecycle.propose(OfferingDraft {
        tutor_id: req.tutor_id,
        subject: req.subject,
        timeslot: req.timeslot,
        delivery_mode: req.delivery_mode,
        meeting_link: req.meeting_link,
        room_hint: req.room,
    })?;
    Ok((StatusCode::CREATED, Json(offering)))
}

/// GET /v1/offerings — List offerings, optionally filtered by status.
#[utoipa::path(
    get,
    path = "/v1/offerings",
    params(
        ("filter" = Option<OfferingFilter>, Query, description = "all (default), approved, or pending"),
    ),
    responses(
        (status = 200, description = "Offerings ordered by id", body = Vec<ClassOffering>),
    ),
    tag = "offerings"
)]
pub(crate) async fn list_offerings(
    State(state): State<AppState>,
    Query(query): Query<ListOfferingsQuery>,
) -> Json<Vec<ClassOffering>> {
    Json(state.lifecycle.list(query.filter))
}

/// GET /v1/offerings/:id — Get one offering.
#[utoipa::path(
    get,
    path = "/v1/offerings/{id}",
    params(("id" = String, Path, description = "Offering id")),
    responses(
        (status = 200, description = "Offering found", body = ClassOffering),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "offerings"
)]
pub(crate) async fn get_offering(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassOffering>, AppError> {
    Ok(Json(state.lifecycle.get(&id)?))
}

/// POST /v1/offerings/:id/approve — Approve a pending offering
/// (coordinator action), assigning a room when it is offline.
#[utoipa::path(
    post,
    path = "/v1/offerings/{id}/approve",
    params(("id" = String, Path, description = "Offering id")),
    request_body = ApproveOfferingRequest,
    responses(
        (status = 200, description = "Offering approved", body = ClassOffering),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Schedule conflict or illegal transition", body = crate::error::ErrorBody),
        (status = 422, description = "Missing or unknown room", body = crate::error::ErrorBody),
    ),
    tag = "offerings"
)]
pub(crate) async fn approve_offering(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ApproveOfferingRequest>, JsonRejection>,
) -> Result<Json<ClassOffering>, AppError> {
    let req = extract_validated_json(body)?;
    Ok(Json(state.lifecycle.approve(&id, req.room_id.as_deref())?))
}

/// POST /v1/offerings/:id/reject — Reject a pending offering with a reason.
#[utoipa::path(
    post,
    path = "/v1/offerings/{id}/reject",
    params(("id" = String, Path, description = "Offering id")),
    request_body = RejectOfferingRequest,
    responses(
        (status = 200, description = "Offering rejected", body = ClassOffering),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Offering already decided", body = crate::error::ErrorBody),
        (status = 422, description = "Missing reason", body = crate::error::ErrorBody),
    ),
    tag = "offerings"
)]
pub(crate) async fn reject_offering(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<RejectOfferingRequest>, JsonRejection>,
) -> Result<Json<ClassOffering>, AppError> {
    let req = extract_validated_json(body)?;
    Ok(Json(state.lifecycle.reject(&id, &req.reason)?))
}

/// POST /v1/offerings/:id/progress — Record a tutor progress note.
///
/// Dual-represented: an inline entry in the offering's progress-notes map
/// plus a report row.
#[utoipa::path(
    post,
    path = "/v1/offerings/{id}/progress",
    params(("id" = String, Path, description = "Offering id")),
    request_body = RecordProgressRequest,
    responses(
        (status = 200, description = "Note recorded", body = RecordProgressResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Tutor mismatch or empty note", body = crate::error::ErrorBody),
    ),
    tag = "offerings"
)]
pub(crate) async fn record_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<RecordProgressRequest>, JsonRejection>,
) -> Result<Json<RecordProgressResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let timestamp = state
        .reports
        .record_tutor_progress(&id, &req.tutor_id, &req.note)?;
    Ok(Json(RecordProgressResponse { timestamp }))
}

/// GET /v1/coverage — Offerings per subject, all statuses.
#[utoipa::path(
    get,
    path = "/v1/coverage",
    responses(
        (status = 200, description = "Subject to offering count"),
    ),
    tag = "offerings"
)]
pub(crate) async fn subject_coverage(State(state): State<AppState>) -> Json<BTreeMap<String, usize>> {
    Json(state.dashboard.subject_coverage())
}

/// GET /v1/offerings/review-queue — Pending and rejected offerings
/// (coordinator view).
#[utoipa::path(
    get,
    path = "/v1/offerings/review-queue",
    responses(
        (status = 200, description = "Offerings awaiting or denied a decision", body = Vec<ClassOffering>),
    ),
    tag = "offerings"
)]
pub(crate) async fn review_queue(State(state): State<AppState>) -> Json<Vec<ClassOffering>> {
    Json(state.dashboard.review_queue())
}

/// GET /v1/offerings/decided — Offerings that have been decided
/// (coordinator view).
#[utoipa::path(
    get,
    path = "/v1/offerings/decided",
    responses(
        (status = 200, description = "Approved and rejected offerings", body = Vec<ClassOffering>),
    ),
    tag = "offerings"
)]
pub(crate) async fn decided_classes(State(state): State<AppState>) -> Json<Vec<ClassOffering>> {
    Json(state.dashboard.decided_classes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use tutorhub_core::{OfferingStatus, Room};

    fn test_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let state = AppState::open(dir.path()).unwrap();
        (dir, state)
    }

    fn test_app(state: &AppState) -> Router {
        router().with_state(state.clone())
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

    const ONLINE_PROPOSAL: &str = r#"{
        "tutor_id": "tut-1",
        "subject": "Mathematics",
        "timeslot": {"start": "2026-03-02T09:00:00", "end": "2026-03-02T10:00:00"},
        "delivery_mode": "online",
        "meeting_link": "https://meet.example/abc"
    }"#;

    #[tokio::test]
    async fn propose_returns_201_pending() {
        let (_dir, state) = test_state();
        let resp = test_app(&state)
            .oneshot(post_json("/v1/offerings", ONLINE_PROPOSAL))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let offering: ClassOffering = body_json(resp).await;
        assert_eq!(offering.id, "cls-001");
        assert_eq!(offering.status, OfferingStatus::Pending);
    }

    #[tokio::test]
    async fn propose_inverted_timeslot_returns_422() {
        let (_dir, state) = test_state();
        let body = r#"{
            "tutor_id": "tut-1",
            "subject": "Mathematics",
            "timeslot": {"start": "2026-03-02T10:00:00", "end": "2026-03-02T09:00:00"},
            "delivery_mode": "online",
            "meeting_link": "https://meet.example/abc"
        }"#;
        let resp = test_app(&state)
            .oneshot(post_json("/v1/offerings", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn propose_online_without_link_returns_422() {
        let (_dir, state) = test_state();
        let body = r#"{
            "tutor_id": "tut-1",
            "subject": "Mathematics",
            "timeslot": {"start": "2026-03-02T09:00:00", "end": "2026-03-02T10:00:00"},
            "delivery_mode": "online"
        }"#;
        let resp = test_app(&state)
            .oneshot(post_json("/v1/offerings", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err: crate::error::ErrorBody = body_json(resp).await;
        assert_eq!(err.error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn approve_unknown_offering_returns_404() {
        let (_dir, state) = test_state();
        let resp = test_app(&state)
            .oneshot(post_json("/v1/offerings/cls-999/approve", "{}"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn approve_online_returns_200_approved() {
        let (_dir, state) = test_state();
        let app = test_app(&state);
        let resp = app
            .clone()
            .oneshot(post_json("/v1/offerings", ONLINE_PROPOSAL))
            .await
            .unwrap();
        let offering: ClassOffering = body_json(resp).await;

        let resp = app
            .oneshot(post_json(&format!("/v1/offerings/{}/approve", offering.id), "{}"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let approved: ClassOffering = body_json(resp).await;
        assert_eq!(approved.status, OfferingStatus::Approved);
    }

    #[tokio::test]
    async fn approve_conflicting_room_returns_409_naming_the_booked_class() {
        let (_dir, state) = test_state();
        state
            .stores
            .rooms
            .update(|m| {
                m.insert(
                    "B4-303".into(),
                    Room {
                        room_id: "B4-303".into(),
                        capacity: 10,
                    },
                )
            })
            .unwrap();
        let offline = |slot: &str| {
            format!(
                r#"{{
                    "tutor_id": "tut-{slot}",
                    "subject": "Physics",
                    "timeslot": {},
                    "delivery_mode": "offline"
                }}"#,
                match slot {
                    "a" => r#"{"start": "2026-03-02T09:00:00", "end": "2026-03-02T10:00:00"}"#,
                    _ => r#"{"start": "2026-03-02T09:30:00", "end": "2026-03-02T10:30:00"}"#,
                }
            )
        };
        let app = test_app(&state);
        let resp = app
            .clone()
            .oneshot(post_json("/v1/offerings", &offline("a")))
            .await
            .unwrap();
        let first: ClassOffering = body_json(resp).await;
        app.clone()
            .oneshot(post_json(
                &format!("/v1/offerings/{}/approve", first.id),
                r#"{"room_id": "B4-303"}"#,
            ))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(post_json("/v1/offerings", &offline("b")))
            .await
            .unwrap();
        let second: ClassOffering = body_json(resp).await;
        let resp = app
            .oneshot(post_json(
                &format!("/v1/offerings/{}/approve", second.id),
                r#"{"room_id": "B4-303"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let err: crate::error::ErrorBody = body_json(resp).await;
        assert_eq!(err.error.code, "SCHEDULE_CONFLICT");
        assert!(err.error.message.contains(&first.id));
    }

    #[tokio::test]
    async fn reject_with_empty_reason_returns_422_and_stays_pending() {
        let (_dir, state) = test_state();
        let app = test_app(&state);
        let resp = app
            .clone()
            .oneshot(post_json("/v1/offerings", ONLINE_PROPOSAL))
            .await
            .unwrap();
        let offering: ClassOffering = body_json(resp).await;

        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/offerings/{}/reject", offering.id),
                r#"{"reason": ""}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/offerings/{}", offering.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let current: ClassOffering = body_json(resp).await;
        assert_eq!(current.status, OfferingStatus::Pending);
    }

    #[tokio::test]
    async fn list_filter_narrows_by_status() {
        let (_dir, state) = test_state();
        let app = test_app(&state);
        let resp = app
            .clone()
            .oneshot(post_json("/v1/offerings", ONLINE_PROPOSAL))
            .await
            .unwrap();
        let offering: ClassOffering = body_json(resp).await;
        app.clone()
            .oneshot(post_json(&format!("/v1/offerings/{}/approve", offering.id), "{}"))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/offerings?filter=approved")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let approved: Vec<ClassOffering> = body_json(resp).await;
        assert_eq!(approved.len(), 1);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/v1/offerings?filter=pending")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let pending: Vec<ClassOffering> = body_json(resp).await;
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn record_progress_returns_timestamp() {
        let (_dir, state) = test_state();
        let app = test_app(&state);
        let resp = app
            .clone()
            .oneshot(post_json("/v1/offerings", ONLINE_PROPOSAL))
            .await
            .unwrap();
        let offering: ClassOffering = body_json(resp).await;

        let resp = app
            .oneshot(post_json(
                &format!("/v1/offerings/{}/progress", offering.id),
                r#"{"tutor_id": "tut-1", "note": "covered limits"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let progress: RecordProgressResponse = body_json(resp).await;
        assert_eq!(progress.timestamp.len(), 16);
    }

    #[tokio::test]
    async fn coverage_counts_subjects() {
        let (_dir, state) = test_state();
        let app = test_app(&state);
        app.clone()
            .oneshot(post_json("/v1/offerings", ONLINE_PROPOSAL))
            .await
            .unwrap();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/v1/coverage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let coverage: BTreeMap<String, usize> = body_json(resp).await;
        assert_eq!(coverage.get("Mathematics"), Some(&1));
    }

    #[tokio::test]
    async fn review_queue_holds_pending_and_rejected() {
        let (_dir, state) = test_state();
        let app = test_app(&state);
        let resp = app
            .clone()
            .oneshot(post_json("/v1/offerings", ONLINE_PROPOSAL))
            .await
            .unwrap();
        let offering: ClassOffering = body_json(resp).await;
        app.clone()
            .oneshot(post_json(
                &format!("/v1/offerings/{}/reject", offering.id),
                r#"{"reason": "duplicate of cls-000"}"#,
            ))
            .await
            .unwrap();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/v1/offerings/review-queue")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let queue: Vec<ClassOffering> = body_json(resp).await;
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].status, OfferingStatus::Rejected);
    }
}

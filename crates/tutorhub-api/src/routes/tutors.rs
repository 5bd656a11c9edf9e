//! # Tutor API
//!
//! A tutor's own offerings and their dashboard summary.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use tutorhub_core::ClassOffering;
use tutorhub_engine::DashboardSummary;

use crate::state::AppState;

/// Build the tutors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tutors/:id/offerings", get(tutor_offerings))
        .route("/v1/tutors/:id/dashboard", get(tutor_dashboard))
}

/// GET /v1/tutors/:id/offerings — All of a tutor's offerings, any status.
#[utoipa::path(
    get,
    path = "/v1/tutors/{id}/offerings",
    params(("id" = String, Path, description = "Tutor id")),
    responses(
        (status = 200, description = "The tutor's offerings ordered by id", body = Vec<ClassOffering>),
    ),
    tag = "tutors"
)]
pub(crate) async fn tutor_offerings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<ClassOffering>> {
    Json(state.lifecycle.list_for_tutor(&id))
}

/// GET /v1/tutors/:id/dashboard — Quick stats and the next few classes.
///
/// "Upcoming" is evaluated against the server's local wall clock, matching
/// the naive timeslots classes are scheduled in.
#[utoipa::path(
    get,
    path = "/v1/tutors/{id}/dashboard",
    params(("id" = String, Path, description = "Tutor id")),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
    ),
    tag = "tutors"
)]
pub(crate) async fn tutor_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DashboardSummary> {
    Json(state.dashboard.summary(&id, Local::now().naive_local()))
}

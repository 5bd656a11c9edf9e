//! # OpenAPI Document
//!
//! Generated from the `#[utoipa::path]` annotations on the handlers and
//! served at `/openapi.json`.

use axum::Json;
use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tutorhub API",
        description = "Tutoring session coordination: offering lifecycle, conflict-checked scheduling, enrollment, reports, and dashboards.",
    ),
    paths(
        routes::offerings::propose_offering,
        routes::offerings::list_offerings,
        routes::offerings::get_offering,
        routes::offerings::approve_offering,
        routes::offerings::reject_offering,
        routes::offerings::record_progress,
        routes::offerings::subject_coverage,
        routes::offerings::review_queue,
        routes::offerings::decided_classes,
        routes::students::join_class,
        routes::students::leave_class,
        routes::students::enrolled_classes,
        routes::students::browse_classes,
        routes::tutors::tutor_offerings,
        routes::tutors::tutor_dashboard,
        routes::reports::add_evaluation,
        routes::reports::class_reports,
        routes::reports::tutor_reports,
        routes::reports::student_reports,
        routes::reports::all_evaluations,
        routes::reports::all_progress_notes,
        routes::rooms::list_rooms,
        routes::rooms::register_room,
        routes::rooms::update_room,
    ),
    components(schemas(
        tutorhub_core::TimeSlot,
        tutorhub_core::ClassOffering,
        tutorhub_core::DeliveryMode,
        tutorhub_core::OfferingStatus,
        tutorhub_core::Enrollment,
        tutorhub_core::EnrollmentStatus,
        tutorhub_core::Room,
        tutorhub_core::Report,
        tutorhub_core::ReportKind,
        tutorhub_engine::EnrolledClass,
        tutorhub_engine::BrowseClass,
        tutorhub_engine::ProgressNoteEntry,
        tutorhub_engine::QuickStats,
        tutorhub_engine::DashboardSummary,
        tutorhub_engine::OfferingFilter,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        routes::offerings::ProposeOfferingRequest,
        routes::offerings::ApproveOfferingRequest,
        routes::offerings::RejectOfferingRequest,
        routes::offerings::RecordProgressRequest,
        routes::offerings::RecordProgressResponse,
        routes::students::JoinClassRequest,
        routes::reports::AddEvaluationRequest,
        routes::rooms::RegisterRoomRequest,
        routes::rooms::UpdateRoomRequest,
    )),
    tags(
        (name = "offerings", description = "Offering lifecycle and coordinator views"),
        (name = "enrollments", description = "Joining, leaving, and browsing classes"),
        (name = "tutors", description = "Tutor listings and dashboards"),
        (name = "reports", description = "Progress reports and evaluations"),
        (name = "rooms", description = "Physical room registry"),
    )
)]
pub struct ApiDoc;

/// GET /openapi.json
pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

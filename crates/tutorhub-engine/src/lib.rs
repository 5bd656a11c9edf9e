//! # tutorhub-engine — Coordination Logic
//!
//! The services that own Tutorhub's invariants:
//!
//! - [`lifecycle`] — the offering state machine (`Pending → Approved |
//!   Rejected`), conflict-gated approval, id assignment, progress notes.
//! - [`enrollment`] — keeps the enrollment ledger and per-offering rosters
//!   in agreement, applying the conflict detector in student scope.
//! - [`reports`] — tutor progress reports (dual-represented) and student
//!   evaluations.
//! - [`dashboard`] — read-only aggregations: coverage, upcoming classes,
//!   tutor quick stats, coordinator review views.
//!
//! Services are constructed once at process start around a shared
//! [`tutorhub_store::Stores`] and injected wherever needed — there is no
//! ambient global state.
//!
//! ## Lock order
//!
//! Composite operations acquire collection locks in a fixed order:
//! enrollment ledger, then offerings, then rooms. Conflict checks and the
//! writes they gate always share one critical section.

pub mod dashboard;
pub mod enrollment;
pub mod error;
pub mod lifecycle;
pub mod reports;

pub use dashboard::{DashboardAggregator, DashboardSummary, QuickStats};
pub use enrollment::{BrowseClass, BrowseView, EnrolledClass, EnrollmentCoordinator};
pub use error::EngineError;
pub use lifecycle::{OfferingDraft, OfferingFilter, OfferingLifecycle};
pub use reports::{ProgressNoteEntry, ReportService};

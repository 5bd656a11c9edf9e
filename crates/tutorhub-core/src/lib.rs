//! # tutorhub-core — Foundational Types for Tutorhub
//!
//! Pure domain layer: no I/O, no clocks beyond what callers pass in.
//!
//! - [`timeslot`] — half-open `[start, end)` local-time intervals with the
//!   `end > start` invariant enforced at construction and deserialization.
//! - [`model`] — persisted entities: class offerings, the enrollment ledger
//!   row, rooms, and reports.
//! - [`conflict`] — the conflict detector: scope-filtered overlap checks
//!   (room, tutor, student) used to gate approval and enrollment.

pub mod conflict;
pub mod model;
pub mod timeslot;

pub use conflict::{first_room_conflict, first_student_conflict, first_tutor_conflict};
pub use model::{
    ClassOffering, DeliveryMode, Enrollment, EnrollmentStatus, OfferingStatus, Report, ReportKind,
    Room,
};
pub use timeslot::{TimeSlot, TimeSlotError};

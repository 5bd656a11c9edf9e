//! # Domain Model
//!
//! Persisted entity types: [`ClassOffering`], [`Enrollment`], [`Room`],
//! and [`Report`].
//!
//! An offering's roster and the enrollment ledger are a dual representation
//! of the same fact. The store does not enforce their agreement — the
//! enrollment coordinator does, inside a single critical section.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::timeslot::TimeSlot;

/// How a class is delivered. Offline classes get a coordinator-assigned
/// room at approval time; online classes carry a meeting link from creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Online,
    Offline,
}

/// Offering lifecycle status.
///
/// `Pending` transitions exactly once, to `Approved` or `Rejected`, by a
/// coordinator action. Both are terminal; no further transition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OfferingStatus {
    Pending,
    Approved,
    Rejected,
}

impl OfferingStatus {
    /// Approved and Rejected admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// A tutoring session proposed by a tutor, pending coordinator approval.
///
/// Field invariants:
/// - `room` is present iff `delivery_mode == Offline` and `status == Approved`;
/// - `meeting_link` is present iff `delivery_mode == Online` (set at creation);
/// - `roster` is non-empty only while `status == Approved`;
/// - `rejection_reason` is present iff `status == Rejected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassOffering {
    /// Opaque id, `cls-NNN`, monotonically assigned by the lifecycle manager.
    pub id: String,
    pub subject: String,
    pub tutor_id: String,
    pub timeslot: TimeSlot,
    pub delivery_mode: DeliveryMode,
    /// Physical room id, coordinator-assigned on approval of offline classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Video-call link for online classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub status: OfferingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Students currently enrolled. Mirrors the enrollment ledger.
    #[serde(default)]
    pub roster: BTreeSet<String>,
    /// Tutor progress notes keyed by `YYYY-MM-DD HH:MM` timestamp strings.
    /// Minute resolution: two notes recorded in the same minute collide and
    /// the later one wins.
    #[serde(default)]
    pub progress_notes: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment status. Absence of a ledger row means "not enrolled" — there
/// is no soft-delete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EnrollmentStatus {
    Enrolled,
}

/// A row in the enrollment ledger, identified by the (student, class) pair.
///
/// `tutor_id` is denormalized from the offering at enroll time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Enrollment {
    pub student_id: String,
    pub class_id: String,
    pub tutor_id: String,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    /// Ledger key for a (student, class) pair. One active enrollment per pair.
    ///
    /// `/` is the separator, so neither id may contain it; the enrollment
    /// coordinator rejects such student ids before writing (class ids are
    /// lifecycle-assigned `cls-NNN` and cannot contain it).
    pub fn key_for(class_id: &str, student_id: &str) -> String {
        format!("{class_id}/{student_id}")
    }

    pub fn key(&self) -> String {
        Self::key_for(&self.class_id, &self.student_id)
    }
}

/// A physical room. Rooms are independent of offerings: an offline-approved
/// offering references a room by id, and only the schedule-overlap check
/// guards the reference — capacity is not reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub room_id: String,
    /// Seats available. Positive.
    pub capacity: u32,
}

/// Report category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    TutorProgress,
    StudentEvaluation,
}

/// A free-text report attached to a class.
///
/// Tutor-progress reports are additionally mirrored into the offering's
/// `progress_notes` map, keyed by minute-resolution timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub report_id: Uuid,
    pub class_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub content: String,
    pub date: NaiveDate,
}

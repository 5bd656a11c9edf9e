//! # Enrollment Coordinator
//!
//! The enrollment ledger and the per-offering roster are a dual
//! representation of "student s is enrolled in class c". The store keeps
//! them in separate collections and enforces nothing; this coordinator owns
//! both writes inside one critical section, acquiring the ledger lock before
//! the offering lock.
//!
//! Invariant after every successful call: for each student, the set of
//! class ids in the ledger equals the set of rosters containing the student.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tutorhub_core::{
    first_student_conflict, ClassOffering, DeliveryMode, Enrollment, EnrollmentStatus,
    OfferingStatus, TimeSlot,
};
use tutorhub_store::Stores;
use utoipa::ToSchema;

use crate::error::EngineError;

/// A student's enrolled class, ledger row joined with its offering.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrolledClass {
    pub class_id: String,
    pub subject: String,
    pub tutor_id: String,
    pub delivery_mode: DeliveryMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub timeslot: TimeSlot,
    pub status: EnrollmentStatus,
}

/// One approved class in a browse listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrowseClass {
    pub class_id: String,
    pub tutor_id: String,
    pub delivery_mode: DeliveryMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub timeslot: TimeSlot,
}

/// Approved classes a student can join, grouped by subject then tutor.
pub type BrowseView = std::collections::BTreeMap<String, std::collections::BTreeMap<String, Vec<BrowseClass>>>;

#[derive(Clone)]
pub struct EnrollmentCoordinator {
    stores: Arc<Stores>,
}

impl EnrollmentCoordinator {
    pub fn new(stores: Arc<Stores>) -> Self {
        Self { stores }
    }

    /// Enroll a student in an approved class.
    ///
    /// Gated by the conflict detector in student scope against the student's
    /// current schedule. The ledger append and the roster insert both happen
    /// or neither does: on a durable-write failure both in-memory changes are
    /// rolled back before the error is returned.
    pub fn join(&self, student_id: &str, class_id: &str) -> Result<Enrollment, EngineError> {
        // '/' separates the two halves of the ledger key; an id containing
        // it would make distinct (student, class) pairs collide.
        if student_id.contains('/') {
            return Err(EngineError::Validation(format!(
                "student id '{student_id}' must not contain '/'"
            )));
        }

        // Ledger before offerings, always.
        let mut ledger = self.stores.enrollments.lock();
        let mut offerings = self.stores.offerings.lock();

        let offering = offerings
            .get(class_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("class '{class_id}' not found")))?;
        if offering.status != OfferingStatus::Approved {
            return Err(EngineError::State(format!(
                "class '{class_id}' is {:?}; only approved classes accept enrollment",
                offering.status
            )));
        }

        let key = Enrollment::key_for(class_id, student_id);
        if ledger.contains_key(&key) || offering.roster.contains(student_id) {
            return Err(EngineError::State(format!(
                "student '{student_id}' is already enrolled in class '{class_id}'"
            )));
        }

        let conflicting_class = {
            let enrolled_ids: BTreeSet<&str> = ledger
                .values()
                .filter(|e| e.student_id == student_id)
                .map(|e| e.class_id.as_str())
                .collect();
            // Union with roster membership: a roster-only remnant still
            // occupies the student's schedule.
            let mut enrolled: Vec<&ClassOffering> = offerings
                .values()
                .filter(|o| enrolled_ids.contains(o.id.as_str()) || o.roster.contains(student_id))
                .collect();
            enrolled.sort_by(|a, b| a.id.cmp(&b.id));
            first_student_conflict(&offering, enrolled).map(|c| c.id.clone())
        };
        if let Some(conflicting) = conflicting_class {
            return Err(EngineError::Conflict(format!(
                "schedule conflict with class '{conflicting}'"
            )));
        }

        let row = Enrollment {
            student_id: student_id.to_string(),
            class_id: class_id.to_string(),
            tutor_id: offering.tutor_id.clone(),
            status: EnrollmentStatus::Enrolled,
            enrolled_at: Utc::now(),
        };
        let mut updated = offering.clone();
        updated.roster.insert(student_id.to_string());
        updated.updated_at = Utc::now();

        ledger.insert(key.clone(), row.clone());
        offerings.insert(class_id.to_string(), updated);
        if let Err(err) = offerings.persist().and_then(|()| ledger.persist()) {
            ledger.remove(&key);
            offerings.insert(class_id.to_string(), offering);
            // The offerings file may already hold the roster entry; rewrite
            // it from the restored map so durable state matches memory.
            let _ = offerings.persist();
            return Err(err.into());
        }
        tracing::info!(student_id, class_id, "student joined class");
        Ok(row)
    }

    /// Remove a student from a class, clearing whichever of the two
    /// representations still holds the enrollment.
    ///
    /// Fails `NotFound` only when neither the ledger nor the roster contains
    /// the student; a one-sided remnant (from a hand-edited data file) is
    /// repaired rather than rejected.
    pub fn leave(&self, student_id: &str, class_id: &str) -> Result<(), EngineError> {
        let mut ledger = self.stores.enrollments.lock();
        let mut offerings = self.stores.offerings.lock();

        let key = Enrollment::key_for(class_id, student_id);
        let removed_row = ledger.remove(&key);
        let prior_offering = offerings.get(class_id).cloned();
        let in_roster = prior_offering
            .as_ref()
            .is_some_and(|o| o.roster.contains(student_id));

        if removed_row.is_none() && !in_roster {
            return Err(EngineError::NotFound(format!(
                "student '{student_id}' is not enrolled in class '{class_id}'"
            )));
        }

        if in_roster {
            // prior_offering is Some here by construction.
            if let Some(prior) = &prior_offering {
                let mut updated = prior.clone();
                updated.roster.remove(student_id);
                updated.updated_at = Utc::now();
                offerings.insert(class_id.to_string(), updated);
            }
        }

        if let Err(err) = offerings.persist().and_then(|()| ledger.persist()) {
            if let Some(row) = removed_row {
                ledger.insert(key, row);
            }
            if let Some(prior) = prior_offering {
                offerings.insert(class_id.to_string(), prior);
            }
            let _ = offerings.persist();
            return Err(err.into());
        }
        tracing::info!(student_id, class_id, "student left class");
        Ok(())
    }

    /// The student's enrolled classes, ledger rows joined with offerings.
    pub fn enrolled_classes(&self, student_id: &str) -> Vec<EnrolledClass> {
        self.stores
            .enrollments
            .rows_for_student(student_id)
            .into_iter()
            .filter_map(|row| {
                let Some(offering) = self.stores.offerings.get(&row.class_id) else {
                    tracing::warn!(class_id = %row.class_id, "ledger row references missing offering");
                    return None;
                };
                Some(EnrolledClass {
                    class_id: row.class_id,
                    subject: offering.subject,
                    tutor_id: row.tutor_id,
                    delivery_mode: offering.delivery_mode,
                    meeting_link: offering.meeting_link,
                    room: offering.room,
                    timeslot: offering.timeslot,
                    status: row.status,
                })
            })
            .collect()
    }

    /// Approved classes the student has not joined, with optional subject
    /// (case-insensitive) and tutor filters, grouped by subject then tutor.
    pub fn browse(
        &self,
        student_id: &str,
        subject: Option<&str>,
        tutor_id: Option<&str>,
    ) -> BrowseView {
        let enrolled: BTreeSet<String> = self
            .stores
            .enrollments
            .rows_for_student(student_id)
            .into_iter()
            .map(|e| e.class_id)
            .collect();

        let mut view = BrowseView::new();
        for o in self.stores.offerings.list() {
            if o.status != OfferingStatus::Approved || enrolled.contains(&o.id) {
                continue;
            }
            if let Some(wanted) = subject {
                if !o.subject.eq_ignore_ascii_case(wanted) {
                    continue;
                }
            }
            if let Some(wanted) = tutor_id {
                if o.tutor_id != wanted {
                    continue;
                }
            }
            view.entry(o.subject.clone())
                .or_default()
                .entry(o.tutor_id.clone())
                .or_default()
                .push(BrowseClass {
                    class_id: o.id,
                    tutor_id: o.tutor_id,
                    delivery_mode: o.delivery_mode,
                    meeting_link: o.meeting_link,
                    room: o.room,
                    timeslot: o.timeslot,
                });
        }
        view
    }
}

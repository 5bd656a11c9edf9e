//! # Offering Lifecycle Manager
//!
//! Owns the offering state machine: `Pending → Approved | Rejected`, one
//! transition, driven by coordinator actions. Approval is gated by the
//! conflict detector in room scope (offline only) and tutor scope, and the
//! whole check-then-transition runs under the offerings collection lock so
//! the conflict snapshot and the write are one critical section.

use std::sync::Arc;

use chrono::{Local, Utc};
use serde::Deserialize;
use tutorhub_core::{
    first_room_conflict, first_tutor_conflict, ClassOffering, DeliveryMode, OfferingStatus,
    TimeSlot,
};
use tutorhub_store::Stores;
use utoipa::ToSchema;

use crate::error::EngineError;

/// Timestamp key format for progress notes. Minute resolution: two notes
/// recorded within the same minute collide and the later one wins.
const PROGRESS_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A tutor's proposal, before the lifecycle manager assigns identity.
///
/// Any caller-supplied room is ignored: rooms are coordinator-assigned at
/// approval time only.
#[derive(Debug, Clone)]
pub struct OfferingDraft {
    pub tutor_id: String,
    pub subject: String,
    pub timeslot: TimeSlot,
    pub delivery_mode: DeliveryMode,
    pub meeting_link: Option<String>,
    pub room_hint: Option<String>,
}

/// Status filter for offering listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OfferingFilter {
    #[default]
    All,
    Approved,
    Pending,
}

#[derive(Clone)]
pub struct OfferingLifecycle {
    stores: Arc<Stores>,
}

impl OfferingLifecycle {
    pub fn new(stores: Arc<Stores>) -> Self {
        Self { stores }
    }

    /// Create a Pending offering with the next monotonic id.
    ///
    /// Ids are `cls-NNN`: one more than the maximum numeric suffix among
    /// existing ids, `cls-001` on an empty store.
    pub fn propose(&self, draft: OfferingDraft) -> Result<ClassOffering, EngineError> {
        if draft.subject.trim().is_empty() {
            return Err(EngineError::Validation("subject must not be empty".into()));
        }
        let meeting_link = match draft.delivery_mode {
            DeliveryMode::Online => {
                let link = draft
                    .meeting_link
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .ok_or_else(|| {
                        EngineError::Validation("online classes require a meeting link".into())
                    })?;
                Some(link.to_string())
            }
            DeliveryMode::Offline => {
                if draft.room_hint.is_some() {
                    tracing::debug!(
                        tutor_id = %draft.tutor_id,
                        "ignoring caller-supplied room; rooms are assigned at approval"
                    );
                }
                None
            }
        };

        let mut offerings = self.stores.offerings.lock();
        let id = next_offering_id(offerings.values());
        let now = Utc::now();
        let offering = ClassOffering {
            id: id.clone(),
            subject: draft.subject,
            tutor_id: draft.tutor_id,
            timeslot: draft.timeslot,
            delivery_mode: draft.delivery_mode,
            room: None,
            meeting_link,
            status: OfferingStatus::Pending,
            rejection_reason: None,
            roster: Default::default(),
            progress_notes: Default::default(),
            created_at: now,
            updated_at: now,
        };
        offerings.insert(id.clone(), offering.clone());
        if let Err(err) = offerings.persist() {
            offerings.remove(&id);
            return Err(err.into());
        }
        tracing::info!(offering_id = %id, tutor_id = %offering.tutor_id, subject = %offering.subject, "offering proposed");
        Ok(offering)
    }

    /// Approve a pending offering, assigning `room_id` when it is offline.
    ///
    /// Conflict checks and the status transition share one critical section:
    /// either the full transition and room assignment happen together, or
    /// neither does.
    pub fn approve(
        &self,
        offering_id: &str,
        room_id: Option<&str>,
    ) -> Result<ClassOffering, EngineError> {
        let mut offerings = self.stores.offerings.lock();
        let offering = offerings
            .get(offering_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("class offering '{offering_id}' not found")))?;
        if offering.status != OfferingStatus::Pending {
            return Err(EngineError::State(format!(
                "offering '{offering_id}' is {:?} and cannot be approved",
                offering.status
            )));
        }

        let mut candidates: Vec<&ClassOffering> = offerings.values().collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));

        let assigned_room = match offering.delivery_mode {
            DeliveryMode::Offline => {
                let room_id = room_id
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        EngineError::Validation("offline classes require a room assignment".into())
                    })?;
                if !self.stores.rooms.exists(room_id) {
                    return Err(EngineError::Validation(format!(
                        "assigned room '{room_id}' does not exist"
                    )));
                }
                if let Some(hit) = first_room_conflict(&offering, room_id, candidates.iter().copied())
                {
                    return Err(EngineError::Conflict(format!(
                        "room '{room_id}' is already booked for class '{}'",
                        hit.id
                    )));
                }
                Some(room_id.to_string())
            }
            DeliveryMode::Online => None,
        };

        if let Some(hit) = first_tutor_conflict(&offering, candidates.iter().copied()) {
            return Err(EngineError::Conflict(format!(
                "tutor '{}' has another class '{}' overlapping this timeslot",
                offering.tutor_id, hit.id
            )));
        }
        drop(candidates);

        let mut updated = offering.clone();
        updated.status = OfferingStatus::Approved;
        updated.room = assigned_room;
        updated.updated_at = Utc::now();
        offerings.insert(offering_id.to_string(), updated.clone());
        if let Err(err) = offerings.persist() {
            offerings.insert(offering_id.to_string(), offering);
            return Err(err.into());
        }
        tracing::info!(offering_id, room = updated.room.as_deref(), "offering approved");
        Ok(updated)
    }

    /// Reject a pending offering with a mandatory reason.
    pub fn reject(&self, offering_id: &str, reason: &str) -> Result<ClassOffering, EngineError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::Validation(
                "rejection requires a reason from the coordinator".into(),
            ));
        }
        let mut offerings = self.stores.offerings.lock();
        let offering = offerings
            .get(offering_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("class offering '{offering_id}' not found")))?;
        if offering.status != OfferingStatus::Pending {
            return Err(EngineError::State(format!(
                "offering '{offering_id}' is {:?} and cannot be rejected",
                offering.status
            )));
        }
        let mut updated = offering.clone();
        updated.status = OfferingStatus::Rejected;
        updated.rejection_reason = Some(reason.to_string());
        updated.updated_at = Utc::now();
        offerings.insert(offering_id.to_string(), updated.clone());
        if let Err(err) = offerings.persist() {
            offerings.insert(offering_id.to_string(), offering);
            return Err(err.into());
        }
        tracing::info!(offering_id, reason, "offering rejected");
        Ok(updated)
    }

    /// Append a progress note for a class the tutor owns. Returns the
    /// minute-resolution timestamp the note was keyed under.
    pub fn record_progress(
        &self,
        offering_id: &str,
        tutor_id: &str,
        note: &str,
    ) -> Result<String, EngineError> {
        if note.trim().is_empty() {
            return Err(EngineError::Validation("progress note must not be empty".into()));
        }
        let mut offerings = self.stores.offerings.lock();
        let offering = offerings
            .get(offering_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("class offering '{offering_id}' not found")))?;
        if offering.tutor_id != tutor_id {
            return Err(EngineError::Validation(format!(
                "tutor '{tutor_id}' is not assigned to class '{offering_id}'"
            )));
        }
        let stamp = Local::now().format(PROGRESS_STAMP_FORMAT).to_string();
        let mut updated = offering.clone();
        updated.progress_notes.insert(stamp.clone(), note.to_string());
        updated.updated_at = Utc::now();
        offerings.insert(offering_id.to_string(), updated);
        if let Err(err) = offerings.persist() {
            offerings.insert(offering_id.to_string(), offering);
            return Err(err.into());
        }
        Ok(stamp)
    }

    pub fn get(&self, offering_id: &str) -> Result<ClassOffering, EngineError> {
        self.stores
            .offerings
            .get(offering_id)
            .ok_or_else(|| EngineError::NotFound(format!("class offering '{offering_id}' not found")))
    }

    /// Offerings matching the filter, ordered by id.
    pub fn list(&self, filter: OfferingFilter) -> Vec<ClassOffering> {
        self.stores
            .offerings
            .list()
            .into_iter()
            .filter(|o| match filter {
                OfferingFilter::All => true,
                OfferingFilter::Approved => o.status == OfferingStatus::Approved,
                OfferingFilter::Pending => o.status == OfferingStatus::Pending,
            })
            .collect()
    }

    /// All offerings by one tutor, ordered by id.
    pub fn list_for_tutor(&self, tutor_id: &str) -> Vec<ClassOffering> {
        self.stores
            .offerings
            .list()
            .into_iter()
            .filter(|o| o.tutor_id == tutor_id)
            .collect()
    }
}

/// Next monotonic offering id: max numeric suffix + 1, zero-padded to three
/// digits. Ids with no parsable suffix are skipped.
fn next_offering_id<'a>(existing: impl Iterator<Item = &'a ClassOffering>) -> String {
    let max = existing
        .filter_map(|o| o.id.rsplit('-').next())
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("cls-{:03}", max + 1)
}

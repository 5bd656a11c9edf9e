//! # Conflict Detector
//!
//! Pure scope-filtered overlap checks over approved offerings.
//!
//! Each scope narrows the candidate set before applying the half-open
//! [`TimeSlot::overlaps`] predicate, always excluding the offering under
//! test. One overlapping candidate is enough to reject; the *first*
//! conflicting candidate in iteration order is returned so errors can name
//! it. Callers iterate in a deterministic order (the store lists by id).
//!
//! [`TimeSlot::overlaps`]: crate::timeslot::TimeSlot::overlaps

use crate::model::{ClassOffering, DeliveryMode, OfferingStatus};

/// Room scope: approved offline offerings assigned to the same room.
///
/// Returns the first candidate whose timeslot overlaps `offering`'s.
pub fn first_room_conflict<'a>(
    offering: &ClassOffering,
    room_id: &str,
    candidates: impl IntoIterator<Item = &'a ClassOffering>,
) -> Option<&'a ClassOffering> {
    candidates
        .into_iter()
        .filter(|c| c.id != offering.id)
        .filter(|c| c.status == OfferingStatus::Approved)
        .filter(|c| c.delivery_mode == DeliveryMode::Offline)
        .filter(|c| c.room.as_deref() == Some(room_id))
        .find(|c| c.timeslot.overlaps(&offering.timeslot))
}

/// Tutor scope: approved offerings by the same tutor, any delivery mode.
pub fn first_tutor_conflict<'a>(
    offering: &ClassOffering,
    candidates: impl IntoIterator<Item = &'a ClassOffering>,
) -> Option<&'a ClassOffering> {
    candidates
        .into_iter()
        .filter(|c| c.id != offering.id)
        .filter(|c| c.status == OfferingStatus::Approved)
        .filter(|c| c.tutor_id == offering.tutor_id)
        .find(|c| c.timeslot.overlaps(&offering.timeslot))
}

/// Student scope: the offerings the student is currently enrolled in.
///
/// The caller resolves the enrolled set from the ledger; this function only
/// excludes the target offering and tests overlap.
pub fn first_student_conflict<'a>(
    target: &ClassOffering,
    enrolled: impl IntoIterator<Item = &'a ClassOffering>,
) -> Option<&'a ClassOffering> {
    enrolled
        .into_iter()
        .filter(|c| c.id != target.id)
        .find(|c| c.timeslot.overlaps(&target.timeslot))
}

//! # Timeslot
//!
//! A half-open `[start, end)` interval of local wall-clock time.
//!
//! The `end > start` invariant is enforced at construction *and* at
//! deserialization — a timeslot that violates it cannot exist, so the
//! rest of the codebase never re-checks it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors arising from timeslot construction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeSlotError {
    /// The end of the slot does not come strictly after its start.
    #[error("timeslot end ({end}) must be strictly after start ({start})")]
    EndNotAfterStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// A scheduled interval, ISO-8601 local timestamps, `end > start`.
///
/// Serializes as `{"start": "2026-03-02T09:00:00", "end": "2026-03-02T10:00:00"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeSlot {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeSlot {
    /// Construct a timeslot, rejecting `end <= start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, TimeSlotError> {
        if end <= start {
            return Err(TimeSlotError::EndNotAfterStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Half-open overlap test: `a.start < b.end && b.start < a.end`.
    ///
    /// A slot ending exactly when another starts does **not** overlap.
    /// Symmetric in its arguments.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Deserialize as a raw pair, then route through [`TimeSlot::new`] so that
/// inverted intervals are rejected at the deserialization boundary.
impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawTimeSlot {
            start: NaiveDateTime,
            end: NaiveDateTime,
        }
        let raw = RawTimeSlot::deserialize(deserializer)?;
        Self::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn slot(h1: u32, m1: u32, h2: u32, m2: u32) -> TimeSlot {
        TimeSlot::new(at(h1, m1), at(h2, m2)).unwrap()
    }

    #[test]
    fn rejects_end_before_start() {
        assert!(TimeSlot::new(at(10, 0), at(9, 0)).is_err());
    }

    #[test]
    fn rejects_zero_length() {
        assert!(TimeSlot::new(at(9, 0), at(9, 0)).is_err());
    }

    #[test]
    fn overlapping_slots_overlap() {
        assert!(slot(9, 0, 10, 0).overlaps(&slot(9, 30, 10, 30)));
    }

    #[test]
    fn contained_slot_overlaps() {
        assert!(slot(9, 0, 12, 0).overlaps(&slot(10, 0, 11, 0)));
    }

    #[test]
    fn touching_boundary_does_not_overlap() {
        // Half-open semantics: 09:00-10:00 and 10:00-11:00 can share a room.
        assert!(!slot(9, 0, 10, 0).overlaps(&slot(10, 0, 11, 0)));
        assert!(!slot(10, 0, 11, 0).overlaps(&slot(9, 0, 10, 0)));
    }

    #[test]
    fn disjoint_slots_do_not_overlap() {
        assert!(!slot(9, 0, 10, 0).overlaps(&slot(14, 0, 15, 0)));
    }

    #[test]
    fn deserialization_rejects_inverted_interval() {
        let json = r#"{"start":"2026-03-02T10:00:00","end":"2026-03-02T09:00:00"}"#;
        assert!(serde_json::from_str::<TimeSlot>(json).is_err());
    }

    #[test]
    fn deserialization_roundtrip() {
        let s = slot(9, 0, 10, 30);
        let json = serde_json::to_string(&s).unwrap();
        let back: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }

    proptest! {
        /// overlaps(a, b) == overlaps(b, a) for arbitrary valid slots.
        #[test]
        fn overlap_is_symmetric(
            a_start in 0i64..100_000,
            a_len in 1i64..10_000,
            b_start in 0i64..100_000,
            b_len in 1i64..10_000,
        ) {
            let epoch = at(0, 0);
            let a = TimeSlot::new(
                epoch + Duration::minutes(a_start),
                epoch + Duration::minutes(a_start + a_len),
            ).unwrap();
            let b = TimeSlot::new(
                epoch + Duration::minutes(b_start),
                epoch + Duration::minutes(b_start + b_len),
            ).unwrap();
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}

//! # Dashboard Aggregator
//!
//! Read-only views composed from the stores. No state of its own.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tutorhub_core::{ClassOffering, OfferingStatus};
use tutorhub_store::Stores;
use utoipa::ToSchema;

/// Headline numbers for a tutor's dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuickStats {
    pub upcoming_classes: usize,
    pub pending_reports: usize,
    pub total_students: usize,
}

/// Tutor dashboard: quick stats plus the next few classes in detail.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub quick_stats: QuickStats,
    pub upcoming_classes_detail: Vec<ClassOffering>,
}

/// How many upcoming classes appear in the summary detail.
const SUMMARY_DETAIL_LIMIT: usize = 3;

#[derive(Clone)]
pub struct DashboardAggregator {
    stores: Arc<Stores>,
}

impl DashboardAggregator {
    pub fn new(stores: Arc<Stores>) -> Self {
        Self { stores }
    }

    /// Offerings per subject, across **all** statuses. Pending and rejected
    /// proposals count too: coverage is about demand, not just the approved
    /// timetable.
    pub fn subject_coverage(&self) -> BTreeMap<String, usize> {
        let mut coverage = BTreeMap::new();
        for o in self.stores.offerings.list() {
            *coverage.entry(o.subject).or_insert(0) += 1;
        }
        coverage
    }

    /// A tutor's approved classes starting after `now`, soonest first.
    pub fn upcoming_classes(&self, tutor_id: &str, now: NaiveDateTime) -> Vec<ClassOffering> {
        let mut upcoming: Vec<ClassOffering> = self
            .stores
            .offerings
            .list()
            .into_iter()
            .filter(|o| o.tutor_id == tutor_id)
            .filter(|o| o.status == OfferingStatus::Approved)
            .filter(|o| o.timeslot.start() > now)
            .collect();
        upcoming.sort_by_key(|o| o.timeslot.start());
        upcoming
    }

    /// Completed classes still lacking a report.
    ///
    /// Report obligations attach to completed classes, but the lifecycle has
    /// no completion transition yet (status is only Pending, Approved, or
    /// Rejected), so nothing can appear here. Kept so the dashboard shape is
    /// stable when a completion transition lands.
    pub fn pending_reports(&self, _tutor_id: &str) -> Vec<ClassOffering> {
        Vec::new()
    }

    /// Sum of roster sizes over a tutor's classes. With no completion
    /// transition, every class counts as active.
    pub fn active_student_count(&self, tutor_id: &str) -> usize {
        self.stores
            .offerings
            .list()
            .iter()
            .filter(|o| o.tutor_id == tutor_id)
            .map(|o| o.roster.len())
            .sum()
    }

    pub fn summary(&self, tutor_id: &str, now: NaiveDateTime) -> DashboardSummary {
        let upcoming = self.upcoming_classes(tutor_id, now);
        let pending = self.pending_reports(tutor_id);
        DashboardSummary {
            quick_stats: QuickStats {
                upcoming_classes: upcoming.len(),
                pending_reports: pending.len(),
                total_students: self.active_student_count(tutor_id),
            },
            upcoming_classes_detail: upcoming.into_iter().take(SUMMARY_DETAIL_LIMIT).collect(),
        }
    }

    /// Coordinator view: every offering that has been decided (not Pending),
    /// ordered by id.
    pub fn decided_classes(&self) -> Vec<ClassOffering> {
        self.stores
            .offerings
            .list()
            .into_iter()
            .filter(|o| o.status != OfferingStatus::Pending)
            .collect()
    }

    /// Coordinator view: offerings awaiting a decision or already rejected,
    /// ordered by id.
    pub fn review_queue(&self) -> Vec<ClassOffering> {
        self.stores
            .offerings
            .list()
            .into_iter()
            .filter(|o| matches!(o.status, OfferingStatus::Pending | OfferingStatus::Rejected))
            .collect()
    }
}

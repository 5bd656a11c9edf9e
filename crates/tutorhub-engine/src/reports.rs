//! # Report Service
//!
//! Tutor progress reports and student evaluations.
//!
//! Progress reports are dual-represented: a [`Report`] row for querying, and
//! an inline entry in the offering's progress-notes map written through the
//! lifecycle manager.

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tutorhub_core::{Report, ReportKind};
use tutorhub_store::Stores;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::EngineError;
use crate::lifecycle::OfferingLifecycle;

/// A progress note extracted from an offering's inline map.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProgressNoteEntry {
    pub class_id: String,
    pub tutor_id: String,
    pub timestamp: String,
    pub content: String,
}

#[derive(Clone)]
pub struct ReportService {
    stores: Arc<Stores>,
    lifecycle: OfferingLifecycle,
}

impl ReportService {
    pub fn new(stores: Arc<Stores>, lifecycle: OfferingLifecycle) -> Self {
        Self { stores, lifecycle }
    }

    /// Record a tutor progress note: inline map entry plus a report row.
    /// Returns the minute-resolution timestamp of the inline entry.
    ///
    /// The inline write validates offering existence and tutor ownership; if
    /// the report row then fails to persist, the inline note stands and the
    /// store error is surfaced.
    pub fn record_tutor_progress(
        &self,
        class_id: &str,
        tutor_id: &str,
        note: &str,
    ) -> Result<String, EngineError> {
        let stamp = self.lifecycle.record_progress(class_id, tutor_id, note)?;
        self.stores.reports.append(Report {
            report_id: Uuid::new_v4(),
            class_id: class_id.to_string(),
            tutor_id: Some(tutor_id.to_string()),
            student_id: None,
            kind: ReportKind::TutorProgress,
            content: note.to_string(),
            date: Local::now().date_naive(),
        })?;
        Ok(stamp)
    }

    /// File a student's evaluation of a class and its tutor.
    pub fn add_student_evaluation(
        &self,
        class_id: &str,
        tutor_id: &str,
        student_id: &str,
        content: &str,
    ) -> Result<Report, EngineError> {
        if content.trim().is_empty() {
            return Err(EngineError::Validation("evaluation content must not be empty".into()));
        }
        // The evaluated class must exist; anything else is a dangling report.
        let offering = self.lifecycle.get(class_id)?;
        if offering.tutor_id != tutor_id {
            return Err(EngineError::Validation(format!(
                "tutor '{tutor_id}' is not assigned to class '{class_id}'"
            )));
        }
        let report = self.stores.reports.append(Report {
            report_id: Uuid::new_v4(),
            class_id: class_id.to_string(),
            tutor_id: Some(tutor_id.to_string()),
            student_id: Some(student_id.to_string()),
            kind: ReportKind::StudentEvaluation,
            content: content.trim().to_string(),
            date: Local::now().date_naive(),
        })?;
        Ok(report)
    }

    pub fn reports_for_class(&self, class_id: &str) -> Vec<Report> {
        self.stores.reports.filtered(|r| r.class_id == class_id)
    }

    pub fn reports_for_tutor(&self, tutor_id: &str) -> Vec<Report> {
        self.stores
            .reports
            .filtered(|r| r.tutor_id.as_deref() == Some(tutor_id))
    }

    pub fn reports_for_student(&self, student_id: &str) -> Vec<Report> {
        self.stores
            .reports
            .filtered(|r| r.student_id.as_deref() == Some(student_id))
    }

    /// All student evaluations, for oversight views.
    pub fn student_evaluations(&self) -> Vec<Report> {
        self.stores
            .reports
            .filtered(|r| r.kind == ReportKind::StudentEvaluation)
    }

    /// Every inline progress note across all classes.
    pub fn all_progress_notes(&self) -> Vec<ProgressNoteEntry> {
        self.stores
            .offerings
            .list()
            .into_iter()
            .flat_map(|o| {
                let class_id = o.id;
                let tutor_id = o.tutor_id;
                o.progress_notes
                    .into_iter()
                    .map(move |(timestamp, content)| ProgressNoteEntry {
                        class_id: class_id.clone(),
                        tutor_id: tutor_id.clone(),
                        timestamp,
                        content,
                    })
            })
            .collect()
    }
}

//! # Typed Stores
//!
//! One [`JsonCollection`] per entity type, keyed by the entity's identity
//! field, plus the [`Stores`] bundle constructed once at process start and
//! injected into every service.
//!
//! The store enforces no referential integrity: roster/ledger agreement and
//! room references are the engine's responsibility.

use std::path::Path;

use tutorhub_core::{ClassOffering, Enrollment, Report, Room};

use crate::collection::{CollectionGuard, JsonCollection, StoreError};

/// Class offerings, keyed by offering id (`cls-NNN`).
pub struct OfferingStore {
    inner: JsonCollection<ClassOffering>,
}

impl OfferingStore {
    pub fn open(dir: &Path) -> Self {
        Self {
            inner: JsonCollection::open(dir.join("class_offerings.json")),
        }
    }

    pub fn get(&self, id: &str) -> Option<ClassOffering> {
        self.inner.read(|m| m.get(id).cloned())
    }

    /// All offerings, ordered by id. Conflict checks iterate this order, so
    /// "first conflicting offering" is deterministic.
    pub fn list(&self) -> Vec<ClassOffering> {
        let mut all = self.inner.read(|m| m.values().cloned().collect::<Vec<_>>());
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn lock(&self) -> CollectionGuard<'_, ClassOffering> {
        self.inner.lock()
    }

    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut std::collections::HashMap<String, ClassOffering>) -> R,
    ) -> Result<R, StoreError> {
        self.inner.update(f)
    }
}

/// The enrollment ledger, keyed by `class_id/student_id`.
pub struct EnrollmentStore {
    inner: JsonCollection<Enrollment>,
}

impl EnrollmentStore {
    pub fn open(dir: &Path) -> Self {
        Self {
            inner: JsonCollection::open(dir.join("enrollments.json")),
        }
    }

    pub fn contains(&self, class_id: &str, student_id: &str) -> bool {
        let key = Enrollment::key_for(class_id, student_id);
        self.inner.read(|m| m.contains_key(&key))
    }

    /// Ledger rows for one student, ordered by class id.
    pub fn rows_for_student(&self, student_id: &str) -> Vec<Enrollment> {
        let mut rows = self.inner.read(|m| {
            m.values()
                .filter(|e| e.student_id == student_id)
                .cloned()
                .collect::<Vec<_>>()
        });
        rows.sort_by(|a, b| a.class_id.cmp(&b.class_id));
        rows
    }

    /// Ledger rows for one class, ordered by student id.
    pub fn rows_for_class(&self, class_id: &str) -> Vec<Enrollment> {
        let mut rows = self.inner.read(|m| {
            m.values()
                .filter(|e| e.class_id == class_id)
                .cloned()
                .collect::<Vec<_>>()
        });
        rows.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        rows
    }

    pub fn lock(&self) -> CollectionGuard<'_, Enrollment> {
        self.inner.lock()
    }
}

/// Physical rooms, keyed by room id.
pub struct RoomStore {
    inner: JsonCollection<Room>,
}

impl RoomStore {
    pub fn open(dir: &Path) -> Self {
        Self {
            inner: JsonCollection::open(dir.join("rooms.json")),
        }
    }

    pub fn get(&self, room_id: &str) -> Option<Room> {
        self.inner.read(|m| m.get(room_id).cloned())
    }

    pub fn exists(&self, room_id: &str) -> bool {
        self.inner.read(|m| m.contains_key(room_id))
    }

    pub fn list(&self) -> Vec<Room> {
        let mut all = self.inner.read(|m| m.values().cloned().collect::<Vec<_>>());
        all.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        all
    }

    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut std::collections::HashMap<String, Room>) -> R,
    ) -> Result<R, StoreError> {
        self.inner.update(f)
    }
}

/// Free-text reports, keyed by report id.
pub struct ReportStore {
    inner: JsonCollection<Report>,
}

impl ReportStore {
    pub fn open(dir: &Path) -> Self {
        Self {
            inner: JsonCollection::open(dir.join("reports.json")),
        }
    }

    pub fn append(&self, report: Report) -> Result<Report, StoreError> {
        self.inner.update(|m| {
            m.insert(report.report_id.to_string(), report.clone());
            report
        })
    }

    pub fn filtered(&self, pred: impl Fn(&Report) -> bool) -> Vec<Report> {
        let mut rows = self
            .inner
            .read(|m| m.values().filter(|r| pred(r)).cloned().collect::<Vec<_>>());
        rows.sort_by(|a, b| (a.date, a.report_id).cmp(&(b.date, b.report_id)));
        rows
    }
}

/// All entity collections, opened once against a data directory.
///
/// Composite operations that span the ledger and the offerings collection
/// must acquire the enrollment lock before the offering lock.
pub struct Stores {
    pub offerings: OfferingStore,
    pub enrollments: EnrollmentStore,
    pub rooms: RoomStore,
    pub reports: ReportStore,
}

impl Stores {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir).map_err(|source| StoreError::CreateDir {
            path: data_dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            offerings: OfferingStore::open(data_dir),
            enrollments: EnrollmentStore::open(data_dir),
            rooms: RoomStore::open(data_dir),
            reports: ReportStore::open(data_dir),
        })
    }
}

//! # Application State
//!
//! The entity stores and the services built over them, constructed once at
//! process start and cloned into every handler. No per-request construction,
//! no ambient globals.

use std::path::Path;
use std::sync::Arc;

use tutorhub_engine::{
    DashboardAggregator, EnrollmentCoordinator, OfferingLifecycle, ReportService,
};
use tutorhub_store::{StoreError, Stores};

#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<Stores>,
    pub lifecycle: OfferingLifecycle,
    pub enrollment: EnrollmentCoordinator,
    pub reports: ReportService,
    pub dashboard: DashboardAggregator,
}

impl AppState {
    /// Open the stores under `data_dir` and wire up the service graph.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let stores = Arc::new(Stores::open(data_dir)?);
        let lifecycle = OfferingLifecycle::new(stores.clone());
        Ok(Self {
            enrollment: EnrollmentCoordinator::new(stores.clone()),
            reports: ReportService::new(stores.clone(), lifecycle.clone()),
            dashboard: DashboardAggregator::new(stores.clone()),
            lifecycle,
            stores,
        })
    }
}

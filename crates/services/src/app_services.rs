use std::sync::Arc;

use exam_core::model::AssessmentId;
use storage::repository::Storage;

use crate::catalog::{AssessmentCatalog, ConfigOverrides};
use crate::error::AppServicesError;
use crate::history::AttemptHistoryService;
use crate::Clock;

/// Assembles app-facing services for one assessment.
#[derive(Clone)]
pub struct AppServices {
    assessment_id: AssessmentId,
    clock: Clock,
    catalog: Arc<AssessmentCatalog>,
    history: Arc<AttemptHistoryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        assessment_id: AssessmentId,
        overrides: ConfigOverrides,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, assessment_id, overrides))
    }

    /// Build services over an existing `Storage` (in-memory in tests).
    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        assessment_id: AssessmentId,
        overrides: ConfigOverrides,
    ) -> Self {
        let catalog = Arc::new(
            AssessmentCatalog::new(Arc::clone(&storage.assessments))
                .with_overrides(overrides)
                .with_clock(clock),
        );
        let history = Arc::new(AttemptHistoryService::new(Arc::clone(&storage.attempts)));
        Self {
            assessment_id,
            clock,
            catalog,
            history,
        }
    }

    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<AssessmentCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn history(&self) -> Arc<AttemptHistoryService> {
        Arc::clone(&self.history)
    }
}

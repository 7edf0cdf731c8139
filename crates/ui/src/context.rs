use std::sync::Arc;

use exam_core::model::AssessmentId;
use services::{AssessmentCatalog, AttemptHistoryService, Clock};

pub trait UiApp: Send + Sync {
    fn assessment_id(&self) -> AssessmentId;
    fn clock(&self) -> Clock;

    fn catalog(&self) -> Arc<AssessmentCatalog>;
    fn history(&self) -> Arc<AttemptHistoryService>;
}

#[derive(Clone)]
pub struct AppContext {
    assessment_id: AssessmentId,
    clock: Clock,
    catalog: Arc<AssessmentCatalog>,
    history: Arc<AttemptHistoryService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            assessment_id: app.assessment_id(),
            clock: app.clock(),
            catalog: app.catalog(),
            history: app.history(),
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

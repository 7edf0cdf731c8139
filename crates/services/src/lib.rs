#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod history;
pub mod sessions;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use catalog::{AssessmentCatalog, ConfigOverrides, LoadedAssessment, QuestionSource};
pub use error::{AppServicesError, AssessmentServiceError};
pub use history::{AttemptHistoryService, HistorySink};
pub use sessions::{
    Collaborators, SessionController, SessionEvent, TokioCountdown, run_session_loop,
};

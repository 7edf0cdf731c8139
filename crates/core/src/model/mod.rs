mod attempt;
mod config;
mod ids;
mod question;
mod report;
mod session;

pub use ids::{AssessmentId, AttemptId, OPTION_COUNT, OptionIndex, ParseIdError, QuestionId};

pub use attempt::{AttemptSummary, AttemptSummaryError};
pub use config::{AssessmentConfig, ConfigError};
pub use question::{Question, QuestionError, QuestionSet, QuestionSetError};
pub use report::{
    Grade, NOT_ANSWERED, Report, ReportInput, ReviewEntry, ReviewFilter, ReviewStatus,
    SubmitReason, assessment_code, build_report, score_percent,
};
pub use session::{
    Session, SessionError, SessionPhase, SessionSetupError, SessionState, TickOutcome,
    ViolationKind, ViolationOutcome,
};

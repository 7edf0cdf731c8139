use thiserror::Error;

use crate::generator::GeneratorError;
use crate::model::{
    AttemptSummaryError, ConfigError, QuestionError, QuestionSetError, SessionError,
    SessionSetupError,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    SessionSetup(#[from] SessionSetupError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    AttemptSummary(#[from] AttemptSummaryError),
}

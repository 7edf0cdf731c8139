use dioxus::prelude::*;
use services::AssessmentServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Storage,
    InvalidAssessment,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::Storage => "Could not read saved data. Please try again.",
            ViewError::InvalidAssessment => "This assessment is not configured correctly.",
        }
    }
}

impl From<AssessmentServiceError> for ViewError {
    fn from(err: AssessmentServiceError) -> Self {
        tracing::warn!(error = %err, "view load failed");
        match err {
            AssessmentServiceError::Storage(_) => ViewError::Storage,
            AssessmentServiceError::Config(_)
            | AssessmentServiceError::Setup(_)
            | AssessmentServiceError::Generator(_) => ViewError::InvalidAssessment,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

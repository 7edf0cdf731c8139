mod assessment;
mod history;
mod state;

pub use assessment::AssessmentView;
pub use history::HistoryView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

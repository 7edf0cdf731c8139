use exam_core::model::AttemptId;
use exam_core::time::format_elapsed;
use storage::repository::AttemptRow;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptCardVm {
    pub id: AttemptId,
    pub completed_at_str: String,
    pub assessment_code: String,

    pub score: u8,
    pub grade: &'static str,
    pub passed: bool,
    pub correct: u32,
    pub wrong: u32,
    pub unanswered: u32,
    pub total: u32,
    pub time_taken: String,
    pub reason: &'static str,
}

impl AttemptCardVm {
    #[must_use]
    pub fn verdict(&self) -> &'static str {
        if self.passed { "PASSED" } else { "FAILED" }
    }
}

impl From<&AttemptRow> for AttemptCardVm {
    fn from(row: &AttemptRow) -> Self {
        let summary = &row.summary;
        Self {
            id: row.id,
            completed_at_str: format_datetime(summary.completed_at()),
            assessment_code: summary.assessment_code().to_owned(),
            score: summary.score(),
            grade: summary.grade().as_str(),
            passed: summary.passed(),
            correct: summary.correct(),
            wrong: summary.wrong(),
            unanswered: summary.unanswered(),
            total: summary.total(),
            time_taken: format_elapsed(summary.time_taken_secs()),
            reason: summary.reason().as_str(),
        }
    }
}

#[must_use]
pub fn map_attempt_cards(rows: &[AttemptRow]) -> Vec<AttemptCardVm> {
    rows.iter().map(AttemptCardVm::from).collect()
}

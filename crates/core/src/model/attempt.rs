use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::AssessmentId;
use crate::model::report::{Grade, Report, SubmitReason, score_percent};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("total ({total}) does not match answer counts ({sum})")]
    CountMismatch { total: u32, sum: u32 },

    #[error("stored score {stored} does not match computed score {computed}")]
    ScoreMismatch { stored: u8, computed: u8 },
}

/// Persistable summary of one finished attempt.
///
/// Review entries stay with the in-memory `Report`; history only needs totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSummary {
    assessment_id: AssessmentId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    score: u8,
    passed: bool,
    grade: Grade,
    correct: u32,
    wrong: u32,
    unanswered: u32,
    time_taken_secs: u32,
    reason: SubmitReason,
    violation_count: u32,
    assessment_code: String,
}

impl AttemptSummary {
    #[must_use]
    pub fn from_report(assessment_id: AssessmentId, report: &Report) -> Self {
        Self {
            assessment_id,
            started_at: report.started_at(),
            completed_at: report.completed_at(),
            score: report.score(),
            passed: report.passed(),
            grade: report.grade(),
            correct: report.correct(),
            wrong: report.wrong(),
            unanswered: report.unanswered(),
            time_taken_secs: report.time_taken_secs(),
            reason: report.reason(),
            violation_count: report.violation_count(),
            assessment_code: report.assessment_code().to_owned(),
        }
    }

    /// Rehydrate an attempt summary from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptSummaryError` when timestamps, counts or score disagree.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        assessment_id: AssessmentId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        score: u8,
        passed: bool,
        correct: u32,
        wrong: u32,
        unanswered: u32,
        total: u32,
        time_taken_secs: u32,
        reason: SubmitReason,
        violation_count: u32,
        assessment_code: String,
    ) -> Result<Self, AttemptSummaryError> {
        if completed_at < started_at {
            return Err(AttemptSummaryError::InvalidTimeRange);
        }
        let sum = correct + wrong + unanswered;
        if sum != total {
            return Err(AttemptSummaryError::CountMismatch { total, sum });
        }
        let computed = score_percent(correct, total);
        if computed != score {
            return Err(AttemptSummaryError::ScoreMismatch {
                stored: score,
                computed,
            });
        }

        Ok(Self {
            assessment_id,
            started_at,
            completed_at,
            score,
            passed,
            grade: Grade::from_score(score),
            correct,
            wrong,
            unanswered,
            time_taken_secs,
            reason,
            violation_count,
            assessment_code,
        })
    }

    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.grade
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.unanswered
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct + self.wrong + self.unanswered
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken_secs
    }

    #[must_use]
    pub fn reason(&self) -> SubmitReason {
        self.reason
    }

    #[must_use]
    pub fn violation_count(&self) -> u32 {
        self.violation_count
    }

    #[must_use]
    pub fn assessment_code(&self) -> &str {
        &self.assessment_code
    }
}

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::config::AssessmentConfig;
use crate::model::ids::{OPTION_COUNT, OptionIndex, QuestionId};
use crate::model::question::QuestionSet;
use crate::time::format_elapsed;

/// Text shown in place of the selected option for unanswered questions.
pub const NOT_ANSWERED: &str = "Not answered";

/// Why a session left the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitReason {
    Manual,
    TimeExpired,
    TabSwitchLimit,
    FullscreenExitLimit,
}

impl SubmitReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmitReason::Manual => "manual",
            SubmitReason::TimeExpired => "time-expired",
            SubmitReason::TabSwitchLimit => "tab-switch-limit",
            SubmitReason::FullscreenExitLimit => "fullscreen-exit-limit",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "time-expired" => Some(Self::TimeExpired),
            "tab-switch-limit" => Some(Self::TabSwitchLimit),
            "fullscreen-exit-limit" => Some(Self::FullscreenExitLimit),
            _ => None,
        }
    }

    /// True for system-triggered submissions (timer or violation limit).
    #[must_use]
    pub fn is_forced(self) -> bool {
        !matches!(self, SubmitReason::Manual)
    }

    /// Human-readable notice shown when the system submits on the user's behalf.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            SubmitReason::Manual => "Test submitted",
            SubmitReason::TimeExpired => "Test auto-submitted: Time expired",
            SubmitReason::TabSwitchLimit => "Test auto-submitted: Tab switch limit exceeded",
            SubmitReason::FullscreenExitLimit => {
                "Test auto-submitted: Fullscreen exit limit exceeded"
            }
        }
    }
}

impl fmt::Display for SubmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Correct,
    Incorrect,
    Unanswered,
}

impl ReviewStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReviewStatus::Correct => "✓ Correct",
            ReviewStatus::Incorrect => "✗ Incorrect",
            ReviewStatus::Unanswered => "○ Unanswered",
        }
    }
}

/// Letter grade derived from the percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    F,
}

impl Grade {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            _ => Grade::F,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "A+" => Some(Grade::APlus),
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "F" => Some(Grade::F),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-only filter for the review list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewFilter {
    #[default]
    All,
    Correct,
    Incorrect,
    Unanswered,
}

impl ReviewFilter {
    pub const ALL: [ReviewFilter; 4] = [
        ReviewFilter::All,
        ReviewFilter::Correct,
        ReviewFilter::Incorrect,
        ReviewFilter::Unanswered,
    ];

    #[must_use]
    pub fn matches(self, status: ReviewStatus) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Correct => status == ReviewStatus::Correct,
            ReviewFilter::Incorrect => status == ReviewStatus::Incorrect,
            ReviewFilter::Unanswered => status == ReviewStatus::Unanswered,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReviewFilter::All => "All",
            ReviewFilter::Correct => "Correct",
            ReviewFilter::Incorrect => "Incorrect",
            ReviewFilter::Unanswered => "Unanswered",
        }
    }
}

/// One row of the answer review, in original question order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub status: ReviewStatus,
    pub selected: Option<OptionIndex>,
    pub selected_text: String,
    pub correct: OptionIndex,
    pub correct_text: String,
}

/// Scored snapshot of a finished session. Built once and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    score: u8,
    passed: bool,
    grade: Grade,
    correct: u32,
    wrong: u32,
    unanswered: u32,
    total: u32,
    time_taken_secs: u32,
    reason: SubmitReason,
    violation_count: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    assessment_code: String,
    entries: Vec<ReviewEntry>,
}

/// Everything the report builder reads, frozen at the moment of submission.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub questions: &'a QuestionSet,
    pub answers: &'a BTreeMap<QuestionId, OptionIndex>,
    pub config: &'a AssessmentConfig,
    pub time_remaining_secs: u32,
    pub reason: SubmitReason,
    pub violation_count: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// `round(100 * correct / total)` with halves rounded up, in integer math.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

/// Printable assessment code: `TTS-` followed by the last eight digits of the
/// completion timestamp in milliseconds.
#[must_use]
pub fn assessment_code(completed_at: DateTime<Utc>) -> String {
    let millis = completed_at.timestamp_millis().rem_euclid(100_000_000);
    format!("TTS-{millis:08}")
}

/// Classify every question and compute the score.
#[must_use]
pub fn build_report(input: ReportInput<'_>) -> Report {
    let mut correct = 0_u32;
    let mut wrong = 0_u32;
    let mut unanswered = 0_u32;
    let mut entries = Vec::with_capacity(input.questions.len());

    for question in input.questions {
        let selected = input.answers.get(&question.id()).copied();
        let status = match selected {
            None => {
                unanswered += 1;
                ReviewStatus::Unanswered
            }
            Some(choice) if choice == question.correct() => {
                correct += 1;
                ReviewStatus::Correct
            }
            Some(_) => {
                wrong += 1;
                ReviewStatus::Incorrect
            }
        };

        entries.push(ReviewEntry {
            question_id: question.id(),
            prompt: question.prompt().to_owned(),
            options: question.options().clone(),
            status,
            selected,
            selected_text: selected.map_or_else(
                || NOT_ANSWERED.to_owned(),
                |choice| question.option_text(choice).to_owned(),
            ),
            correct: question.correct(),
            correct_text: question.correct_text().to_owned(),
        });
    }

    let total = correct + wrong + unanswered;
    let score = score_percent(correct, total);

    Report {
        score,
        passed: score >= input.config.pass_threshold,
        grade: Grade::from_score(score),
        correct,
        wrong,
        unanswered,
        total,
        time_taken_secs: input
            .config
            .duration_secs
            .saturating_sub(input.time_remaining_secs),
        reason: input.reason,
        violation_count: input.violation_count,
        started_at: input.started_at,
        completed_at: input.completed_at,
        assessment_code: assessment_code(input.completed_at),
        entries,
    }
}

impl Report {
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
        self.total
    }

    /// Marks obtained; every question is worth one mark.
    #[must_use]
    pub fn marks_obtained(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken_secs
    }

    /// Time taken as `m:ss`.
    #[must_use]
    pub fn time_taken_label(&self) -> String {
        format_elapsed(self.time_taken_secs)
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
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn assessment_code(&self) -> &str {
        &self.assessment_code
    }

    #[must_use]
    pub fn entries(&self) -> &[ReviewEntry] {
        &self.entries
    }

    /// Review entries matching `filter`, original order preserved.
    pub fn filtered(&self, filter: ReviewFilter) -> impl Iterator<Item = &ReviewEntry> {
        self.entries
            .iter()
            .filter(move |entry| filter.matches(entry.status))
    }
}

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::config::{AssessmentConfig, ConfigError};
use crate::model::ids::{OptionIndex, QuestionId};
use crate::model::question::{Question, QuestionSet};
use crate::model::report::{Report, ReportInput, SubmitReason, build_report};

/// Lifecycle of one attempt. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    NotStarted,
    Active,
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::NotStarted => "not-started",
            SessionPhase::Active => "active",
            SessionPhase::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Source of an integrity violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The window/document became hidden.
    TabHidden,
    /// Immersive (fullscreen) mode was left.
    FullscreenExit,
}

impl ViolationKind {
    /// Reason recorded when this kind of violation exhausts the limit.
    #[must_use]
    pub fn limit_reason(self) -> SubmitReason {
        match self {
            ViolationKind::TabHidden => SubmitReason::TabSwitchLimit,
            ViolationKind::FullscreenExit => SubmitReason::FullscreenExitLimit,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{op} is not allowed while the session is {phase}")]
    InvalidTransition {
        op: &'static str,
        phase: SessionPhase,
    },

    #[error("{what} {value} is out of range (bound {bound})")]
    OutOfRange {
        what: &'static str,
        value: u64,
        bound: u64,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("configured for {expected} questions but the set has {actual}")]
    QuestionCountMismatch { expected: u32, actual: usize },
}

/// Result of reporting a violation to an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationOutcome {
    /// Counted; the session stays active with `remaining` attempts left.
    Counted { count: u32, remaining: u32 },
    /// Counted and the limit is reached; the caller must force submission.
    LimitReached { count: u32, reason: SubmitReason },
    /// Fullscreen exit already latched; nothing was counted.
    Latched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_secs: u32 },
    /// Remaining time hit zero; the caller must force `time-expired` submission.
    Expired,
}

/// Mutable bookkeeping for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    phase: SessionPhase,
    current_index: usize,
    answers: BTreeMap<QuestionId, OptionIndex>,
    violation_count: u32,
    time_remaining_secs: u32,
    fullscreen_latched: bool,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    submit_reason: Option<SubmitReason>,
}

impl SessionState {
    fn new(duration_secs: u32) -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            current_index: 0,
            answers: BTreeMap::new(),
            violation_count: 0,
            time_remaining_secs: duration_secs,
            fullscreen_latched: false,
            started_at: None,
            finished_at: None,
            submit_reason: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<QuestionId, OptionIndex> {
        &self.answers
    }

    #[must_use]
    pub fn violation_count(&self) -> u32 {
        self.violation_count
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    #[must_use]
    pub fn fullscreen_latched(&self) -> bool {
        self.fullscreen_latched
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn submit_reason(&self) -> Option<SubmitReason> {
        self.submit_reason
    }
}

/// Test-session state machine: `NotStarted → Active → Finished`.
///
/// Every mutating operation checks the phase first and returns
/// `SessionError::InvalidTransition` instead of touching state once the
/// session has finished. Side effects (timers, fullscreen, rendering) belong
/// to the caller; this type only owns the bookkeeping and the report.
#[derive(Debug, Clone)]
pub struct Session {
    questions: QuestionSet,
    config: AssessmentConfig,
    state: SessionState,
    report: Option<Report>,
}

impl Session {
    /// # Errors
    ///
    /// Returns `SessionSetupError` for an invalid config or when the question
    /// set size differs from `config.total_questions`.
    pub fn new(questions: QuestionSet, config: AssessmentConfig) -> Result<Self, SessionSetupError> {
        let config = config.validate()?;
        let expected = config.total_questions;
        if usize::try_from(expected).ok() != Some(questions.len()) {
            return Err(SessionSetupError::QuestionCountMismatch {
                expected,
                actual: questions.len(),
            });
        }

        Ok(Self {
            questions,
            state: SessionState::new(config.duration_secs),
            config,
            report: None,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.phase == SessionPhase::Finished
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // `current_index` is kept within `0..len` and the set is never empty.
        &self.questions.as_slice()[self.state.current_index]
    }

    #[must_use]
    pub fn selected_for(&self, id: QuestionId) -> Option<OptionIndex> {
        self.state.answers.get(&id).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.state.answers.len()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.questions.len() - self.state.answers.len()
    }

    /// Violations left before forced submission.
    #[must_use]
    pub fn remaining_attempts(&self) -> u32 {
        self.config
            .violation_limit
            .saturating_sub(self.state.violation_count)
    }

    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.config.is_low_time(self.state.time_remaining_secs)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.state.current_index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.state.current_index + 1 == self.questions.len()
    }

    /// The report, present once the session has finished.
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    fn require_active(&self, op: &'static str) -> Result<(), SessionError> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                op,
                phase: self.state.phase,
            })
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `NotStarted`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.state.phase != SessionPhase::NotStarted {
            return Err(SessionError::InvalidTransition {
                op: "start",
                phase: self.state.phase,
            });
        }

        self.state = SessionState::new(self.config.duration_secs);
        self.state.phase = SessionPhase::Active;
        self.state.started_at = Some(now);
        Ok(())
    }

    /// Record (or overwrite) the chosen option for a question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active and
    /// `SessionError::OutOfRange` for an unknown question or option.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        option: u8,
    ) -> Result<OptionIndex, SessionError> {
        self.require_active("record_answer")?;
        if !self.questions.contains(question_id) {
            return Err(SessionError::OutOfRange {
                what: "question id",
                value: u64::from(question_id.value()),
                bound: self.questions.len() as u64,
            });
        }
        let option = OptionIndex::new(option).ok_or(SessionError::OutOfRange {
            what: "option index",
            value: u64::from(option),
            bound: crate::model::ids::OPTION_COUNT as u64,
        })?;

        self.state.answers.insert(question_id, option);
        Ok(option)
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active and
    /// `SessionError::OutOfRange` when `index >= N`.
    pub fn go_to(&mut self, index: usize) -> Result<usize, SessionError> {
        self.require_active("go_to")?;
        if index >= self.questions.len() {
            return Err(SessionError::OutOfRange {
                what: "question index",
                value: index as u64,
                bound: self.questions.len() as u64,
            });
        }
        self.state.current_index = index;
        Ok(index)
    }

    /// Move forward one question; stays on the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.require_active("next")?;
        if !self.is_last() {
            self.state.current_index += 1;
        }
        Ok(self.state.current_index)
    }

    /// Move back one question; stays on the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.require_active("previous")?;
        self.state.current_index = self.state.current_index.saturating_sub(1);
        Ok(self.state.current_index)
    }

    /// Count one violation of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active.
    pub fn report_violation(&mut self, kind: ViolationKind) -> Result<ViolationOutcome, SessionError> {
        self.require_active("report_violation")?;
        self.state.violation_count += 1;
        let count = self.state.violation_count;

        if count >= self.config.violation_limit {
            return Ok(ViolationOutcome::LimitReached {
                count,
                reason: kind.limit_reason(),
            });
        }

        Ok(ViolationOutcome::Counted {
            count,
            remaining: self.remaining_attempts(),
        })
    }

    /// Fullscreen was left. Counted once until fullscreen is entered again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active.
    pub fn fullscreen_exited(&mut self) -> Result<ViolationOutcome, SessionError> {
        self.require_active("fullscreen_exited")?;
        if self.state.fullscreen_latched {
            return Ok(ViolationOutcome::Latched);
        }
        self.state.fullscreen_latched = true;
        self.report_violation(ViolationKind::FullscreenExit)
    }

    /// Fullscreen was (re-)entered; clears the exit latch.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active.
    pub fn fullscreen_entered(&mut self) -> Result<(), SessionError> {
        self.require_active("fullscreen_entered")?;
        self.state.fullscreen_latched = false;
        Ok(())
    }

    /// Consume one second of the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.require_active("tick")?;
        self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
        if self.state.time_remaining_secs == 0 {
            return Ok(TickOutcome::Expired);
        }
        Ok(TickOutcome::Running {
            remaining_secs: self.state.time_remaining_secs,
        })
    }

    /// Freeze the session and build its report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when not active, which makes
    /// repeated submissions no-ops for the caller.
    pub fn finish(&mut self, reason: SubmitReason, now: DateTime<Utc>) -> Result<&Report, SessionError> {
        self.require_active("finish")?;
        self.state.phase = SessionPhase::Finished;
        self.state.finished_at = Some(now);
        self.state.submit_reason = Some(reason);

        let report = build_report(ReportInput {
            questions: &self.questions,
            answers: &self.state.answers,
            config: &self.config,
            time_remaining_secs: self.state.time_remaining_secs,
            reason,
            violation_count: self.state.violation_count,
            started_at: self.state.started_at.unwrap_or(now),
            completed_at: now,
        });
        Ok(&*self.report.insert(report))
    }
}

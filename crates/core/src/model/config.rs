use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("total_questions must be at least 1")]
    NoQuestions,

    #[error("duration_secs must be at least 1")]
    ZeroDuration,

    #[error("violation_limit must be at least 1")]
    ZeroViolationLimit,

    #[error("pass_threshold must be within 0..=100, got {0}")]
    PassThresholdOutOfRange(u8),
}

/// Constants fixed for the lifetime of one assessment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub total_questions: u32,
    pub duration_secs: u32,
    pub violation_limit: u32,
    /// Minimum score (percent) required to pass.
    pub pass_threshold: u8,
    /// The timer switches to its warning style at or below this many seconds.
    pub low_time_threshold_secs: u32,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            total_questions: 30,
            duration_secs: 30 * 60,
            violation_limit: 3,
            pass_threshold: 60,
            low_time_threshold_secs: 5 * 60,
        }
    }
}

impl AssessmentConfig {
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.total_questions == 0 {
            return Err(ConfigError::NoQuestions);
        }
        if self.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.violation_limit == 0 {
            return Err(ConfigError::ZeroViolationLimit);
        }
        if self.pass_threshold > 100 {
            return Err(ConfigError::PassThresholdOutOfRange(self.pass_threshold));
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_total_questions(mut self, total_questions: u32) -> Self {
        self.total_questions = total_questions;
        self
    }

    #[must_use]
    pub fn with_duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    #[must_use]
    pub fn with_violation_limit(mut self, violation_limit: u32) -> Self {
        self.violation_limit = violation_limit;
        self
    }

    #[must_use]
    pub fn with_pass_threshold(mut self, pass_threshold: u8) -> Self {
        self.pass_threshold = pass_threshold;
        self
    }

    #[must_use]
    pub fn is_low_time(&self, remaining_secs: u32) -> bool {
        remaining_secs <= self.low_time_threshold_secs
    }
}

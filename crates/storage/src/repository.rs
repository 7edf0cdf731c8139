use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::model::{
    AssessmentConfig, AssessmentId, AttemptId, AttemptSummary, QuestionSet,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted assessment header: title plus the per-assessment rules.
///
/// The question count is not stored here; it is whatever the bank holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub title: String,
    pub duration_secs: u32,
    pub violation_limit: u32,
    pub pass_threshold: u8,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRecord {
    /// Record carrying the default rules from `AssessmentConfig::default()`.
    #[must_use]
    pub fn with_defaults(id: AssessmentId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let defaults = AssessmentConfig::default();
        Self {
            id,
            title: title.into(),
            duration_secs: defaults.duration_secs,
            violation_limit: defaults.violation_limit,
            pass_threshold: defaults.pass_threshold,
            created_at,
        }
    }

    /// Session config for a bank of `total_questions` questions.
    #[must_use]
    pub fn config(&self, total_questions: u32) -> AssessmentConfig {
        AssessmentConfig::default()
            .with_total_questions(total_questions)
            .with_duration_secs(self.duration_secs)
            .with_violation_limit(self.violation_limit)
            .with_pass_threshold(self.pass_threshold)
    }
}

/// A persisted attempt together with its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub id: AttemptId,
    pub summary: AttemptSummary,
}

impl AttemptRow {
    #[must_use]
    pub fn new(id: AttemptId, summary: AttemptSummary) -> Self {
        Self { id, summary }
    }
}

/// Repository contract for assessments and their question banks.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or update an assessment header.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the assessment cannot be stored.
    async fn upsert_assessment(&self, record: &AssessmentRecord) -> Result<(), StorageError>;

    /// Fetch an assessment header, `None` when missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_assessment(&self, id: AssessmentId)
    -> Result<Option<AssessmentRecord>, StorageError>;

    /// List assessments ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_assessments(&self, limit: u32) -> Result<Vec<AssessmentRecord>, StorageError>;

    /// Replace the whole bank of an assessment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the assessment is missing.
    async fn replace_questions(
        &self,
        id: AssessmentId,
        questions: &QuestionSet,
    ) -> Result<(), StorageError>;

    /// Load the bank in question order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the assessment has no questions.
    async fn load_questions(&self, id: AssessmentId) -> Result<QuestionSet, StorageError>;
}

/// Append-only history of finished attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the assessment is missing, or
    /// another `StorageError` if the attempt cannot be stored.
    async fn append_attempt(&self, summary: &AttemptSummary) -> Result<AttemptId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_attempt(&self, id: AttemptId) -> Result<AttemptRow, StorageError>;

    /// Newest attempts first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_attempts(
        &self,
        assessment_id: AssessmentId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    assessments: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
    questions: Arc<Mutex<HashMap<AssessmentId, QuestionSet>>>,
    attempts: Arc<Mutex<Vec<AttemptSummary>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn to_attempt_id(index: usize) -> Result<AttemptId, StorageError> {
    AttemptId::try_from(index + 1)
        .map_err(|_| StorageError::Serialization("attempt id overflow".into()))
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_assessment(&self, record: &AssessmentRecord) -> Result<(), StorageError> {
        let mut guard = self.assessments.lock().map_err(poisoned)?;
        guard.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_assessment(
        &self,
        id: AssessmentId,
    ) -> Result<Option<AssessmentRecord>, StorageError> {
        let guard = self.assessments.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_assessments(&self, limit: u32) -> Result<Vec<AssessmentRecord>, StorageError> {
        let guard = self.assessments.lock().map_err(poisoned)?;
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(records)
    }

    async fn replace_questions(
        &self,
        id: AssessmentId,
        questions: &QuestionSet,
    ) -> Result<(), StorageError> {
        if !self.assessments.lock().map_err(poisoned)?.contains_key(&id) {
            return Err(StorageError::NotFound);
        }
        let mut guard = self.questions.lock().map_err(poisoned)?;
        guard.insert(id, questions.clone());
        Ok(())
    }

    async fn load_questions(&self, id: AssessmentId) -> Result<QuestionSet, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, summary: &AttemptSummary) -> Result<AttemptId, StorageError> {
        if !self
            .assessments
            .lock()
            .map_err(poisoned)?
            .contains_key(&summary.assessment_id())
        {
            return Err(StorageError::NotFound);
        }
        let mut guard = self.attempts.lock().map_err(poisoned)?;
        guard.push(summary.clone());
        to_attempt_id(guard.len() - 1)
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<AttemptRow, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        let index = usize::try_from(id)
            .ok()
            .and_then(|v| v.checked_sub(1))
            .ok_or(StorageError::NotFound)?;
        guard
            .get(index)
            .cloned()
            .map(|summary| AttemptRow::new(id, summary))
            .ok_or(StorageError::NotFound)
    }

    async fn list_attempts(
        &self,
        assessment_id: AssessmentId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        let mut rows = Vec::new();
        for (index, summary) in guard.iter().enumerate().rev() {
            if summary.assessment_id() != assessment_id {
                continue;
            }
            rows.push(AttemptRow::new(to_attempt_id(index)?, summary.clone()));
        }
        rows.sort_by(|a, b| {
            b.summary
                .completed_at()
                .cmp(&a.summary.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub assessments: Arc<dyn QuestionRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let assessments: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptRepository> = Arc::new(repo);
        Self {
            assessments,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::SampleGenerator;
    use exam_core::model::SubmitReason;
    use exam_core::time::fixed_now;

    fn attempt(assessment: u64, minutes: i64, correct: u32) -> AttemptSummary {
        let started = fixed_now();
        AttemptSummary::from_persisted(
            AssessmentId::new(assessment),
            started,
            started + chrono::Duration::minutes(minutes),
            exam_core::model::score_percent(correct, 10),
            correct >= 6,
            correct,
            10 - correct,
            0,
            10,
            u32::try_from(minutes * 60).unwrap(),
            SubmitReason::Manual,
            0,
            "TTS-00000001".into(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn questions_require_assessment() {
        let repo = InMemoryRepository::new();
        let set = SampleGenerator::new(1).generate(3).unwrap();
        let id = AssessmentId::new(1);

        let err = repo.replace_questions(id, &set).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        repo.upsert_assessment(&AssessmentRecord::with_defaults(id, "Java", fixed_now()))
            .await
            .unwrap();
        repo.replace_questions(id, &set).await.unwrap();
        assert_eq!(repo.load_questions(id).await.unwrap(), set);
    }

    async fn with_assessments(ids: &[u64]) -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        for id in ids {
            repo.upsert_assessment(&AssessmentRecord::with_defaults(
                AssessmentId::new(*id),
                "Java",
                fixed_now(),
            ))
            .await
            .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn attempt_requires_existing_assessment() {
        let repo = with_assessments(&[1]).await;
        let err = repo.append_attempt(&attempt(2, 10, 5)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
        assert!(repo.append_attempt(&attempt(1, 10, 5)).await.is_ok());
    }

    #[tokio::test]
    async fn attempts_list_newest_first_per_assessment() {
        let repo = with_assessments(&[1, 2]).await;
        let first = repo.append_attempt(&attempt(1, 10, 5)).await.unwrap();
        let _other = repo.append_attempt(&attempt(2, 20, 5)).await.unwrap();
        let second = repo.append_attempt(&attempt(1, 30, 8)).await.unwrap();

        let rows = repo.list_attempts(AssessmentId::new(1), 10).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);

        let fetched = repo.get_attempt(second).await.unwrap();
        assert_eq!(fetched.summary.correct(), 8);
        assert!(matches!(repo.get_attempt(99).await, Err(StorageError::NotFound)));
    }

    #[test]
    fn record_builds_session_config() {
        let record = AssessmentRecord::with_defaults(AssessmentId::new(1), "Java", fixed_now());
        let config = record.config(12);
        assert_eq!(config.total_questions, 12);
        assert_eq!(config.duration_secs, 1800);
        assert_eq!(config.violation_limit, 3);
    }
}

use std::sync::Arc;

use exam_core::model::{AssessmentConfig, AssessmentId, QuestionSet, Session};
use exam_core::{Clock, SampleGenerator};
use storage::repository::{AssessmentRecord, QuestionRepository, StorageError};

use crate::error::AssessmentServiceError;

/// Where a loaded question set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    /// Authored bank stored for the assessment.
    Bank,
    /// Placeholder questions from the sample generator.
    Sample,
}

/// Explicit rule overrides (command line or environment).
///
/// `total_questions` only sizes the sample bank; a stored bank always uses
/// its own length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub total_questions: Option<u32>,
    pub duration_secs: Option<u32>,
    pub violation_limit: Option<u32>,
    pub pass_threshold: Option<u8>,
}

impl ConfigOverrides {
    #[must_use]
    pub fn apply(&self, mut config: AssessmentConfig) -> AssessmentConfig {
        if let Some(duration) = self.duration_secs {
            config = config.with_duration_secs(duration);
        }
        if let Some(limit) = self.violation_limit {
            config = config.with_violation_limit(limit);
        }
        if let Some(threshold) = self.pass_threshold {
            config = config.with_pass_threshold(threshold);
        }
        config
    }
}

/// A question set plus the validated rules for one attempt.
#[derive(Debug, Clone)]
pub struct LoadedAssessment {
    pub id: AssessmentId,
    pub title: String,
    pub questions: QuestionSet,
    pub config: AssessmentConfig,
    pub source: QuestionSource,
}

impl LoadedAssessment {
    /// A fresh, not yet started session over this assessment.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Setup` when config and set disagree.
    pub fn new_session(&self) -> Result<Session, AssessmentServiceError> {
        Ok(Session::new(self.questions.clone(), self.config)?)
    }
}

/// Resolves the questions and rules for an assessment.
#[derive(Clone)]
pub struct AssessmentCatalog {
    assessments: Arc<dyn QuestionRepository>,
    generator: SampleGenerator,
    overrides: ConfigOverrides,
    clock: Clock,
}

const DEFAULT_TITLE: &str = "Sample Assessment";

impl AssessmentCatalog {
    #[must_use]
    pub fn new(assessments: Arc<dyn QuestionRepository>) -> Self {
        Self {
            assessments,
            generator: SampleGenerator::from_entropy(),
            overrides: ConfigOverrides::default(),
            clock: Clock::system(),
        }
    }

    /// Clock stamped on assessment records created by `load`.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: SampleGenerator) -> Self {
        self.generator = generator;
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// List stored assessments.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Storage` on repository failures.
    pub async fn list(&self, limit: u32) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        Ok(self.assessments.list_assessments(limit).await?)
    }

    /// Load the bank for `id`, falling back to sample questions when the
    /// assessment has none.
    ///
    /// A missing assessment is registered with default rules so finished
    /// attempts have a record to reference.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError` for storage failures, an invalid
    /// resulting config or a zero-sized sample bank.
    pub async fn load(&self, id: AssessmentId) -> Result<LoadedAssessment, AssessmentServiceError> {
        let record = match self.assessments.get_assessment(id).await? {
            Some(record) => record,
            None => {
                let record = AssessmentRecord::with_defaults(id, DEFAULT_TITLE, self.clock.now());
                self.assessments.upsert_assessment(&record).await?;
                tracing::info!(assessment = %id, "registered default assessment");
                record
            }
        };

        let (questions, source) = match self.assessments.load_questions(id).await {
            Ok(questions) => (questions, QuestionSource::Bank),
            Err(StorageError::NotFound) => {
                let count = self
                    .overrides
                    .total_questions
                    .unwrap_or(AssessmentConfig::default().total_questions);
                tracing::info!(
                    assessment = %id,
                    count,
                    seed = self.generator.seed(),
                    "no stored questions; using sample bank"
                );
                (self.generator.generate(count)?, QuestionSource::Sample)
            }
            Err(err) => return Err(err.into()),
        };

        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        let config = self.overrides.apply(record.config(total)).validate()?;

        Ok(LoadedAssessment {
            id,
            title: record.title,
            questions,
            config,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn falls_back_to_sample_bank() {
        let repo = Arc::new(InMemoryRepository::new());
        let catalog = AssessmentCatalog::new(repo)
            .with_generator(SampleGenerator::new(3))
            .with_overrides(ConfigOverrides {
                total_questions: Some(5),
                ..ConfigOverrides::default()
            });

        let loaded = catalog.load(AssessmentId::new(1)).await.unwrap();
        assert_eq!(loaded.source, QuestionSource::Sample);
        assert_eq!(loaded.questions.len(), 5);
        assert_eq!(loaded.config.total_questions, 5);
        assert_eq!(loaded.title, DEFAULT_TITLE);
        assert_eq!(loaded.questions, SampleGenerator::new(3).generate(5).unwrap());
        assert!(loaded.new_session().is_ok());
    }

    #[tokio::test]
    async fn sample_fallback_registers_assessment_once() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = AssessmentId::new(4);
        let catalog = AssessmentCatalog::new(repo.clone())
            .with_generator(SampleGenerator::new(3))
            .with_clock(Clock::fixed(fixed_now()));

        catalog.load(id).await.unwrap();
        let record = repo.get_assessment(id).await.unwrap().expect("registered");
        assert_eq!(record.title, DEFAULT_TITLE);
        assert_eq!(record.created_at, fixed_now());

        catalog.load(id).await.unwrap();
        assert_eq!(repo.list_assessments(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stored_bank_uses_record_rules_and_overrides() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = AssessmentId::new(2);
        let mut record = AssessmentRecord::with_defaults(id, "Java", fixed_now());
        record.violation_limit = 5;
        repo.upsert_assessment(&record).await.unwrap();
        let bank = SampleGenerator::new(8).generate(7).unwrap();
        repo.replace_questions(id, &bank).await.unwrap();

        let catalog = AssessmentCatalog::new(repo).with_overrides(ConfigOverrides {
            total_questions: Some(99),
            duration_secs: Some(600),
            ..ConfigOverrides::default()
        });
        let loaded = catalog.load(id).await.unwrap();
        assert_eq!(loaded.source, QuestionSource::Bank);
        assert_eq!(loaded.title, "Java");
        assert_eq!(loaded.config.total_questions, 7);
        assert_eq!(loaded.config.violation_limit, 5);
        assert_eq!(loaded.config.duration_secs, 600);
    }

    #[tokio::test]
    async fn invalid_override_is_rejected() {
        let repo = Arc::new(InMemoryRepository::new());
        let catalog = AssessmentCatalog::new(repo).with_overrides(ConfigOverrides {
            pass_threshold: Some(150),
            ..ConfigOverrides::default()
        });
        let err = catalog.load(AssessmentId::new(1)).await.unwrap_err();
        assert!(matches!(err, AssessmentServiceError::Config(_)));
    }
}

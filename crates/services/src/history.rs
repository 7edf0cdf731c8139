use std::sync::Arc;

use async_trait::async_trait;
use exam_core::model::{AssessmentId, AttemptId, AttemptSummary, Report};
use storage::repository::{AttemptRepository, AttemptRow};

use crate::error::AssessmentServiceError;
use crate::sessions::ports::ReportSink;

/// Read/append access to finished attempts.
#[derive(Clone)]
pub struct AttemptHistoryService {
    attempts: Arc<dyn AttemptRepository>,
}

impl AttemptHistoryService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    /// Persist the summary of a finished report.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Storage` if the attempt cannot be stored.
    pub async fn record(
        &self,
        assessment_id: AssessmentId,
        report: &Report,
    ) -> Result<AttemptId, AssessmentServiceError> {
        let summary = AttemptSummary::from_report(assessment_id, report);
        Ok(self.attempts.append_attempt(&summary).await?)
    }

    /// Newest attempts first.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Storage` on repository failures.
    pub async fn list(
        &self,
        assessment_id: AssessmentId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, AssessmentServiceError> {
        Ok(self.attempts.list_attempts(assessment_id, limit).await?)
    }

    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Storage` when the attempt is missing.
    pub async fn get(&self, id: AttemptId) -> Result<AttemptRow, AssessmentServiceError> {
        Ok(self.attempts.get_attempt(id).await?)
    }

    #[must_use]
    pub fn sink(&self, assessment_id: AssessmentId) -> HistorySink {
        HistorySink {
            history: self.clone(),
            assessment_id,
        }
    }
}

/// `ReportSink` that appends every finished report to the attempt history.
#[derive(Clone)]
pub struct HistorySink {
    history: AttemptHistoryService,
    assessment_id: AssessmentId,
}

#[async_trait(?Send)]
impl ReportSink for HistorySink {
    async fn accept(&self, report: &Report) {
        match self.history.record(self.assessment_id, report).await {
            Ok(id) => tracing::info!(attempt = id, assessment = %self.assessment_id, "attempt saved"),
            Err(err) => tracing::warn!(error = %err, "failed to save attempt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::SampleGenerator;
    use exam_core::model::{AssessmentConfig, Session, SubmitReason};
    use exam_core::time::fixed_now;
    use storage::repository::{AssessmentRecord, InMemoryRepository, QuestionRepository};

    fn finished_report() -> Report {
        let questions = SampleGenerator::new(4).generate(4).unwrap();
        let config = AssessmentConfig::default().with_total_questions(4);
        let mut session = Session::new(questions, config).unwrap();
        session.start(fixed_now()).unwrap();
        session
            .record_answer(exam_core::model::QuestionId::new(1), 0)
            .unwrap();
        session
            .finish(SubmitReason::TimeExpired, fixed_now())
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn sink_appends_to_history() {
        let repo = Arc::new(InMemoryRepository::new());
        let id = AssessmentId::new(1);
        repo.upsert_assessment(&AssessmentRecord::with_defaults(id, "Java", fixed_now()))
            .await
            .unwrap();
        let history = AttemptHistoryService::new(repo);
        let report = finished_report();

        history.sink(id).accept(&report).await;

        let rows = history.list(id, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        let summary = &rows[0].summary;
        assert_eq!(summary.reason(), SubmitReason::TimeExpired);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.unanswered(), 3);
        assert_eq!(summary.assessment_code(), report.assessment_code());
        assert_eq!(history.get(rows[0].id).await.unwrap(), rows[0]);
    }
}

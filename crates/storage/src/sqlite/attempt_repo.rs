use exam_core::model::{AssessmentId, AttemptId, AttemptSummary};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, insert_err, map_attempt_row};
use crate::repository::{AttemptRepository, AttemptRow, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, summary: &AttemptSummary) -> Result<AttemptId, StorageError> {
        let assessment_id = id_i64("assessment_id", summary.assessment_id().value())?;

        let res = sqlx::query(
            r"
                INSERT INTO attempts (
                    assessment_id, started_at, completed_at, score, passed,
                    correct, wrong, unanswered, total, time_taken_secs,
                    reason, violation_count, assessment_code
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ",
        )
        .bind(assessment_id)
        .bind(summary.started_at())
        .bind(summary.completed_at())
        .bind(i64::from(summary.score()))
        .bind(i64::from(summary.passed()))
        .bind(i64::from(summary.correct()))
        .bind(i64::from(summary.wrong()))
        .bind(i64::from(summary.unanswered()))
        .bind(i64::from(summary.total()))
        .bind(i64::from(summary.time_taken_secs()))
        .bind(summary.reason().as_str())
        .bind(i64::from(summary.violation_count()))
        .bind(summary.assessment_code())
        .execute(&self.pool)
        .await
        .map_err(insert_err)?;

        Ok(res.last_insert_rowid())
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<AttemptRow, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    id, assessment_id, started_at, completed_at, score, passed,
                    correct, wrong, unanswered, total, time_taken_secs,
                    reason, violation_count, assessment_code
                FROM attempts
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_attempt_row(&row)
    }

    async fn list_attempts(
        &self,
        assessment_id: AssessmentId,
        limit: u32,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, assessment_id, started_at, completed_at, score, passed,
                    correct, wrong, unanswered, total, time_taken_secs,
                    reason, violation_count, assessment_code
                FROM attempts
                WHERE assessment_id = ?1
                ORDER BY completed_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(id_i64("assessment_id", assessment_id.value())?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }
}

use exam_core::model::{AssessmentId, QuestionSet};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_assessment_row, map_question_row, ser};
use crate::repository::{AssessmentRecord, QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_assessment(&self, record: &AssessmentRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO assessments (
                    id, title, duration_secs, violation_limit, pass_threshold, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    duration_secs = excluded.duration_secs,
                    violation_limit = excluded.violation_limit,
                    pass_threshold = excluded.pass_threshold
            ",
        )
        .bind(id_i64("assessment_id", record.id.value())?)
        .bind(&record.title)
        .bind(i64::from(record.duration_secs))
        .bind(i64::from(record.violation_limit))
        .bind(i64::from(record.pass_threshold))
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_assessment(
        &self,
        id: AssessmentId,
    ) -> Result<Option<AssessmentRecord>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, title, duration_secs, violation_limit, pass_threshold, created_at
                FROM assessments
                WHERE id = ?1
            ",
        )
        .bind(id_i64("assessment_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_assessment_row).transpose()
    }

    async fn list_assessments(&self, limit: u32) -> Result<Vec<AssessmentRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, title, duration_secs, violation_limit, pass_threshold, created_at
                FROM assessments
                ORDER BY id ASC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_assessment_row).collect()
    }

    async fn replace_questions(
        &self,
        id: AssessmentId,
        questions: &QuestionSet,
    ) -> Result<(), StorageError> {
        let assessment_id = id_i64("assessment_id", id.value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let exists = sqlx::query("SELECT 1 FROM assessments WHERE id = ?1")
            .bind(assessment_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        if exists.is_none() {
            return Err(StorageError::NotFound);
        }

        sqlx::query("DELETE FROM questions WHERE assessment_id = ?1")
            .bind(assessment_id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for question in questions {
            let [a, b, c, d] = question.options();
            sqlx::query(
                r"
                    INSERT INTO questions (
                        assessment_id, id, prompt,
                        option_a, option_b, option_c, option_d, correct
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
            )
            .bind(assessment_id)
            .bind(i64::from(question.id().value()))
            .bind(question.prompt())
            .bind(a)
            .bind(b)
            .bind(c)
            .bind(d)
            .bind(i64::from(question.correct().value()))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        tracing::debug!(assessment = %id, count = questions.len(), "replaced question bank");
        Ok(())
    }

    async fn load_questions(&self, id: AssessmentId) -> Result<QuestionSet, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, prompt, option_a, option_b, option_c, option_d, correct
                FROM questions
                WHERE assessment_id = ?1
                ORDER BY id ASC
            ",
        )
        .bind(id_i64("assessment_id", id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        if rows.is_empty() {
            return Err(StorageError::NotFound);
        }

        let mut questions = Vec::with_capacity(rows.len());
        for row in &rows {
            questions.push(map_question_row(row)?);
        }
        QuestionSet::new(questions).map_err(ser)
    }
}

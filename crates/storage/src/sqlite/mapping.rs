use exam_core::model::{
    AssessmentId, AttemptSummary, OptionIndex, Question, QuestionId, SubmitReason,
};
use sqlx::Row;

use crate::repository::{AssessmentRecord, AttemptRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// A missing parent row surfaces as `NotFound`, like the in-memory backend.
pub(crate) fn insert_err(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
        _ => conn(e),
    }
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn u8_from_i64(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn assessment_id_from_i64(v: i64) -> Result<AssessmentId, StorageError> {
    u64::try_from(v)
        .map(AssessmentId::new)
        .map_err(|_| StorageError::Serialization("assessment_id sign overflow".into()))
}

pub(crate) fn parse_reason(s: &str) -> Result<SubmitReason, StorageError> {
    SubmitReason::parse(s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid reason: {s}")))
}

pub(crate) fn map_assessment_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AssessmentRecord, StorageError> {
    Ok(AssessmentRecord {
        id: assessment_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        duration_secs: u32_from_i64(
            "duration_secs",
            row.try_get::<i64, _>("duration_secs").map_err(ser)?,
        )?,
        violation_limit: u32_from_i64(
            "violation_limit",
            row.try_get::<i64, _>("violation_limit").map_err(ser)?,
        )?,
        pass_threshold: u8_from_i64(
            "pass_threshold",
            row.try_get::<i64, _>("pass_threshold").map_err(ser)?,
        )?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(u32_from_i64("id", row.try_get::<i64, _>("id").map_err(ser)?)?);
    let correct_raw = u8_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?;
    let correct = OptionIndex::new(correct_raw)
        .ok_or_else(|| StorageError::Serialization(format!("invalid correct: {correct_raw}")))?;

    let options = [
        row.try_get::<String, _>("option_a").map_err(ser)?,
        row.try_get::<String, _>("option_b").map_err(ser)?,
        row.try_get::<String, _>("option_c").map_err(ser)?,
        row.try_get::<String, _>("option_d").map_err(ser)?,
    ];

    Question::new(
        id,
        row.try_get::<String, _>("prompt").map_err(ser)?,
        options,
        correct,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let reason: String = row.try_get("reason").map_err(ser)?;
    let passed: i64 = row.try_get("passed").map_err(ser)?;

    let summary = AttemptSummary::from_persisted(
        assessment_id_from_i64(row.try_get::<i64, _>("assessment_id").map_err(ser)?)?,
        row.try_get("started_at").map_err(ser)?,
        row.try_get("completed_at").map_err(ser)?,
        u8_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?,
        passed != 0,
        u32_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?,
        u32_from_i64("wrong", row.try_get::<i64, _>("wrong").map_err(ser)?)?,
        u32_from_i64("unanswered", row.try_get::<i64, _>("unanswered").map_err(ser)?)?,
        u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?,
        u32_from_i64(
            "time_taken_secs",
            row.try_get::<i64, _>("time_taken_secs").map_err(ser)?,
        )?,
        parse_reason(&reason)?,
        u32_from_i64(
            "violation_count",
            row.try_get::<i64, _>("violation_count").map_err(ser)?,
        )?,
        row.try_get("assessment_code").map_err(ser)?,
    )
    .map_err(ser)?;

    Ok(AttemptRow::new(id, summary))
}

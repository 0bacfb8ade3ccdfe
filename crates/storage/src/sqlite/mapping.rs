use quiz_core::model::{ResultRecord, SessionId};
use sqlx::Row;

use crate::repository::{ResultRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<ResultRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let session_id = row
        .try_get::<String, _>("session_id")
        .map_err(ser)?
        .parse::<SessionId>()
        .map_err(ser)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let correct_count = u32_from_i64(
        "correct_count",
        row.try_get::<i64, _>("correct_count").map_err(ser)?,
    )?;
    let incorrect_count = u32_from_i64(
        "incorrect_count",
        row.try_get::<i64, _>("incorrect_count").map_err(ser)?,
    )?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;

    Ok(ResultRow::new(
        id,
        ResultRecord {
            session_id,
            score,
            correct_count,
            incorrect_count,
            completed_at,
        },
    ))
}

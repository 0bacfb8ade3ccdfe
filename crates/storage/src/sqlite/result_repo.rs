use quiz_core::model::ResultRecord;

use super::SqliteRepository;
use super::mapping::map_result_row;
use crate::repository::{ResultRepository, ResultRow, StorageError};

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(&self, record: &ResultRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_results (
                    session_id, score, correct_count, incorrect_count, completed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(record.session_id.to_string())
        .bind(i64::from(record.score))
        .bind(i64::from(record.correct_count))
        .bind(i64::from(record.incorrect_count))
        .bind(record.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::Serialization(format!(
                    "result for session {} already stored",
                    record.session_id
                ))
            }
            other => StorageError::Connection(other.to_string()),
        })?;

        Ok(res.last_insert_rowid())
    }

    async fn last_result(&self) -> Result<Option<ResultRow>, StorageError> {
        Ok(self.list_results(1).await?.into_iter().next())
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, session_id, score, correct_count, incorrect_count, completed_at
                FROM quiz_results
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_result_row).collect()
    }
}

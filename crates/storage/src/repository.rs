use async_trait::async_trait;
use quiz_core::model::ResultRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted record with its storage identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: i64,
    pub record: ResultRecord,
}

impl ResultRow {
    #[must_use]
    pub fn new(id: i64, record: ResultRecord) -> Self {
        Self { id, record }
    }
}

/// Repository contract for finished-quiz result records.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a result record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_result(&self, record: &ResultRecord) -> Result<i64, StorageError>;

    /// Most recently completed record, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn last_result(&self) -> Result<Option<ResultRow>, StorageError>;

    /// Records ordered newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    results: Arc<Mutex<Vec<ResultRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, record: &ResultRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len() + 1)
            .map_err(|_| StorageError::Serialization("result id overflow".into()))?;
        guard.push(ResultRow::new(id, record.clone()));
        Ok(id)
    }

    async fn last_result(&self) -> Result<Option<ResultRow>, StorageError> {
        Ok(self.list_results(1).await?.into_iter().next())
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = guard.clone();
        rows.sort_by(|a, b| {
            b.record
                .completed_at
                .cmp(&a.record.completed_at)
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Result repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let results: Arc<dyn ResultRepository> = Arc::new(InMemoryRepository::new());
        Self { results }
    }
}

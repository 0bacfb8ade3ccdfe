//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuizError;
use quiz_core::model::QuestionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by quiz sessions and the session workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for a quiz")]
    EmptyPool,
    #[error("question pool unavailable: {reason}")]
    PoolUnavailable { reason: String },
    #[error("quiz already in progress")]
    AlreadyInProgress,
    #[error("quiz is not in progress")]
    NotInProgress,
    #[error("quiz has not finished")]
    NotFinished,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading a question pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolLoadError {
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse questions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("question record {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

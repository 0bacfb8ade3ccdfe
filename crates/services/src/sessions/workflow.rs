use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use quiz_core::QuestionPool;
use quiz_core::model::{QuizResult, QuizSettings, ResultRecord};
use storage::repository::{ResultRepository, ResultRow};

use crate::Clock;
use crate::error::{PoolLoadError, SessionError};
use crate::pool_loader::{load_questions, parse_questions};
use super::service::QuizSession;

/// Load state of the question pool behind the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolState {
    Loading,
    Ready(QuestionPool),
    Failed(String),
}

impl PoolState {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, PoolState::Ready(_))
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        match self {
            PoolState::Ready(pool) => pool.len(),
            PoolState::Loading | PoolState::Failed(_) => 0,
        }
    }
}

/// Outcome of finishing a quiz through the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub result: QuizResult,
    pub record: ResultRecord,
    /// Row id of the stored record, `None` when persistence failed or was skipped.
    pub persisted: Option<i64>,
}

/// Orchestrates pool loading, quiz start and result persistence.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    settings: QuizSettings,
    pool: PoolState,
    results: Arc<dyn ResultRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, settings: QuizSettings, results: Arc<dyn ResultRepository>) -> Self {
        Self {
            clock,
            settings,
            pool: PoolState::Loading,
            results,
        }
    }

    #[must_use]
    pub fn with_pool(mut self, pool: QuestionPool) -> Self {
        self.set_pool(pool);
        self
    }

    pub fn set_pool(&mut self, pool: QuestionPool) {
        self.pool = PoolState::Ready(pool);
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn pool_state(&self) -> &PoolState {
        &self.pool
    }

    /// True when the pool is loaded and has at least one question.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.pool.question_count() > 0
    }

    /// Loads the pool from a JSON string. On failure the pool becomes `Failed`.
    ///
    /// # Errors
    ///
    /// Returns the `PoolLoadError` that was recorded.
    pub fn load_pool_from_str(&mut self, json: &str) -> Result<usize, PoolLoadError> {
        self.pool = PoolState::Loading;
        self.apply_load(parse_questions(json))
    }

    /// Loads the pool from a question file. On failure the pool becomes `Failed`.
    ///
    /// # Errors
    ///
    /// Returns the `PoolLoadError` that was recorded.
    pub fn load_pool_from_path(&mut self, path: &Path) -> Result<usize, PoolLoadError> {
        self.pool = PoolState::Loading;
        self.apply_load(load_questions(path))
    }

    fn apply_load(
        &mut self,
        loaded: Result<Vec<quiz_core::model::Question>, PoolLoadError>,
    ) -> Result<usize, PoolLoadError> {
        match loaded {
            Ok(questions) => {
                let count = questions.len();
                self.pool = PoolState::Ready(QuestionPool::new(questions));
                Ok(count)
            }
            Err(err) => {
                self.pool = PoolState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Builds an idle session over the loaded pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PoolUnavailable` while loading or after a failed load.
    pub fn new_session(&self) -> Result<QuizSession, SessionError> {
        match &self.pool {
            PoolState::Ready(pool) => Ok(QuizSession::new(pool.clone(), self.settings, self.clock)),
            PoolState::Loading => Err(SessionError::PoolUnavailable {
                reason: "questions are still loading".to_owned(),
            }),
            PoolState::Failed(reason) => Err(SessionError::PoolUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    /// Builds a session and starts the first quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PoolUnavailable` or `SessionError::EmptyPool`.
    pub fn start_session(&self) -> Result<QuizSession, SessionError> {
        let mut session = self.new_session()?;
        session.start()?;
        Ok(session)
    }

    /// Finishes the quiz (if still running) and stores its record.
    ///
    /// A storage failure is logged and reported through `persisted: None`;
    /// the graded result is still returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` if the session was never started.
    #[instrument(skip_all, target = "quiz")]
    pub async fn finish(&self, session: &mut QuizSession) -> Result<QuizOutcome, SessionError> {
        if !session.is_finished() {
            session.finish()?;
        }
        let result = session.result().cloned().ok_or(SessionError::NotFinished)?;
        let record = session.result_record().ok_or(SessionError::NotFinished)?;
        let persisted = self.persist_result(session).await;
        Ok(QuizOutcome {
            result,
            record,
            persisted,
        })
    }

    /// Stores the finished session's record once. Later calls are no-ops.
    pub async fn persist_result(&self, session: &mut QuizSession) -> Option<i64> {
        if session.is_recorded() {
            return None;
        }
        let record = session.result_record()?;
        match self.results.append_result(&record).await {
            Ok(id) => {
                session.mark_recorded();
                info!(target: "quiz", session_id = %record.session_id, row_id = id, "stored quiz result");
                Some(id)
            }
            Err(err) => {
                warn!(target: "quiz", session_id = %record.session_id, error = %err, "failed to store quiz result");
                None
            }
        }
    }

    /// Most recent stored result, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the repository fails.
    pub async fn last_result(&self) -> Result<Option<ResultRow>, SessionError> {
        Ok(self.results.last_result().await?)
    }

    /// Stored results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the repository fails.
    pub async fn recent_results(&self, limit: u32) -> Result<Vec<ResultRow>, SessionError> {
        Ok(self.results.list_results(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    const QUESTIONS: &str = r#"[
        { "question": "2 + 2?", "type": "single", "options": ["3", "4"], "correctAnswer": "4", "points": 1 },
        { "question": "Capital of France?", "type": "text", "correctAnswer": "Paris", "points": 2 }
    ]"#;

    fn service() -> QuizService {
        QuizService::new(
            fixed_clock(),
            QuizSettings::default(),
            Arc::new(InMemoryRepository::new()),
        )
    }

    #[test]
    fn start_requires_a_ready_pool() {
        let mut service = service();
        assert!(!service.can_start());
        assert!(matches!(
            service.start_session(),
            Err(SessionError::PoolUnavailable { .. })
        ));

        assert!(service.load_pool_from_str("not json").is_err());
        assert!(matches!(service.pool_state(), PoolState::Failed(_)));
        assert!(matches!(
            service.start_session(),
            Err(SessionError::PoolUnavailable { .. })
        ));

        assert_eq!(service.load_pool_from_str(QUESTIONS).unwrap(), 2);
        assert!(service.can_start());
        assert_eq!(service.start_session().unwrap().total(), 2);
    }

    #[test]
    fn empty_pool_cannot_start() {
        let mut service = service();
        service.load_pool_from_str("[]").unwrap();
        assert!(service.pool_state().is_ready());
        assert!(!service.can_start());
        assert!(matches!(service.start_session(), Err(SessionError::EmptyPool)));
    }

    #[tokio::test]
    async fn finish_persists_once() {
        let mut service = service();
        service.load_pool_from_str(QUESTIONS).unwrap();
        let mut session = service.start_session().unwrap();

        let outcome = service.finish(&mut session).await.unwrap();
        assert!(outcome.persisted.is_some());
        assert_eq!(outcome.record.incorrect_count, 2);
        assert_eq!(service.persist_result(&mut session).await, None);

        let stored = service.recent_results(10).await.unwrap();
        assert_eq!(stored.len(), 1);
        let last = service.last_result().await.unwrap().unwrap();
        assert_eq!(last.record, outcome.record);
    }
}

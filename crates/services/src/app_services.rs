use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::repository::{ResultRepository, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::sessions::QuizService;

/// Assembles app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    results: Arc<dyn ResultRepository>,
    quiz: QuizService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, settings))
    }

    /// Build services that keep results in memory for the life of the process.
    #[must_use]
    pub fn in_memory(clock: Clock, settings: QuizSettings) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, settings)
    }

    fn from_storage(storage: &Storage, clock: Clock, settings: QuizSettings) -> Self {
        let results = Arc::clone(&storage.results);
        let quiz = QuizService::new(clock, settings, Arc::clone(&results));
        Self { results, quiz }
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizService {
        &self.quiz
    }

    pub fn quiz_mut(&mut self) -> &mut QuizService {
        &mut self.quiz
    }

    #[must_use]
    pub fn results(&self) -> Arc<dyn ResultRepository> {
        Arc::clone(&self.results)
    }
}

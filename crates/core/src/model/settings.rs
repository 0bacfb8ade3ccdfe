use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per quiz must be > 0")]
    InvalidQuestionsPerQuiz,

    #[error("seconds per question must be > 0")]
    InvalidSecondsPerQuestion,

    #[error("low time threshold ({threshold}s) must not exceed seconds per question ({seconds}s)")]
    InvalidLowTimeThreshold { threshold: u32, seconds: u32 },
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for a quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    questions_per_quiz: u32,
    seconds_per_question: u32,
    low_time_threshold_secs: u32,
}

impl QuizSettings {
    pub const DEFAULT_QUESTIONS_PER_QUIZ: u32 = 12;
    pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 30;
    pub const DEFAULT_LOW_TIME_THRESHOLD_SECS: u32 = 10;

    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a count or duration is zero, or if the
    /// low-time threshold is longer than a whole question.
    pub fn new(
        questions_per_quiz: u32,
        seconds_per_question: u32,
        low_time_threshold_secs: u32,
    ) -> Result<Self, SettingsError> {
        if questions_per_quiz == 0 {
            return Err(SettingsError::InvalidQuestionsPerQuiz);
        }
        if seconds_per_question == 0 {
            return Err(SettingsError::InvalidSecondsPerQuestion);
        }
        if low_time_threshold_secs > seconds_per_question {
            return Err(SettingsError::InvalidLowTimeThreshold {
                threshold: low_time_threshold_secs,
                seconds: seconds_per_question,
            });
        }

        Ok(Self {
            questions_per_quiz,
            seconds_per_question,
            low_time_threshold_secs,
        })
    }

    /// Same as `new`, keeping the default low-time threshold when it fits.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a count or duration is zero.
    pub fn with_limits(
        questions_per_quiz: u32,
        seconds_per_question: u32,
    ) -> Result<Self, SettingsError> {
        let threshold = Self::DEFAULT_LOW_TIME_THRESHOLD_SECS.min(seconds_per_question);
        Self::new(questions_per_quiz, seconds_per_question, threshold)
    }

    #[must_use]
    pub fn questions_per_quiz(&self) -> u32 {
        self.questions_per_quiz
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    #[must_use]
    pub fn low_time_threshold_secs(&self) -> u32 {
        self.low_time_threshold_secs
    }

    /// True when `remaining` seconds should be flagged as running low.
    #[must_use]
    pub fn is_low_time(&self, remaining: u32) -> bool {
        remaining <= self.low_time_threshold_secs
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            questions_per_quiz: Self::DEFAULT_QUESTIONS_PER_QUIZ,
            seconds_per_question: Self::DEFAULT_SECONDS_PER_QUESTION,
            low_time_threshold_secs: Self::DEFAULT_LOW_TIME_THRESHOLD_SECS,
        }
    }
}

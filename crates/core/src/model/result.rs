use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::Answer;
use crate::model::ids::SessionId;
use crate::model::question::Question;

/// Grading outcome for one question of a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub position: usize,
    pub question: Question,
    pub user_answer: Answer,
    pub is_correct: bool,
    pub awarded_points: u32,
}

impl ReviewItem {
    /// The user's answer rendered as option text, or `None` when unanswered.
    #[must_use]
    pub fn user_answer_text(&self) -> Option<String> {
        self.user_answer.display(&self.question)
    }

    /// The expected answer, shown only for incorrect items.
    #[must_use]
    pub fn correction(&self) -> Option<String> {
        (!self.is_correct).then(|| self.question.correct_answer_text())
    }

    /// The question's explanation, shown only for incorrect items.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        if self.is_correct {
            None
        } else {
            self.question.explanation()
        }
    }
}

/// Scored result of a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    total_score: u32,
    max_score: u32,
    correct_count: usize,
    incorrect_count: usize,
    review: Vec<ReviewItem>,
}

impl QuizResult {
    /// Aggregates per-question review items into a result.
    #[must_use]
    pub fn from_review(review: Vec<ReviewItem>) -> Self {
        let mut total_score = 0_u32;
        let mut max_score = 0_u32;
        let mut correct_count = 0;

        for item in &review {
            max_score = max_score.saturating_add(item.question.points());
            if item.is_correct {
                correct_count += 1;
                total_score = total_score.saturating_add(item.awarded_points);
            }
        }

        Self {
            total_score,
            max_score,
            correct_count,
            incorrect_count: review.len() - correct_count,
            review,
        }
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    /// Score obtainable if every question were answered correctly.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.incorrect_count
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.review.len()
    }

    #[must_use]
    pub fn review(&self) -> &[ReviewItem] {
        &self.review
    }
}

/// Minimal record of a finished quiz handed to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub session_id: SessionId,
    pub score: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub completed_at: DateTime<Utc>,
}

impl ResultRecord {
    #[must_use]
    pub fn from_result(
        session_id: SessionId,
        result: &QuizResult,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            score: result.total_score(),
            correct_count: u32::try_from(result.correct_count()).unwrap_or(u32::MAX),
            incorrect_count: u32::try_from(result.incorrect_count()).unwrap_or(u32::MAX),
            completed_at,
        }
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.correct_count.saturating_add(self.incorrect_count)
    }
}

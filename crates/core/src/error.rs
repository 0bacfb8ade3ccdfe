use thiserror::Error;

use crate::model::{QuestionError, QuestionKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question pool is empty")]
    EmptyPool,

    #[error("position {position} is outside the quiz (len {len})")]
    InvalidPosition { position: usize, len: usize },

    #[error("question {position} expects a {expected} answer, got {found}")]
    TypeMismatch {
        position: usize,
        expected: QuestionKind,
        found: QuestionKind,
    },

    #[error("option {index} does not exist on question {position} ({options} options)")]
    OptionOutOfRange {
        position: usize,
        index: usize,
        options: usize,
    },

    #[error(transparent)]
    Question(#[from] QuestionError),
}

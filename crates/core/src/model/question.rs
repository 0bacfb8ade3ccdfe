use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("{kind} question needs at least one option")]
    MissingOptions { kind: QuestionKind },

    #[error("correct answer index {index} is out of range for {options} options")]
    KeyOutOfRange { index: usize, options: usize },
}

//
// ─── KIND & KEY ────────────────────────────────────────────────────────────────
//

/// Answer shape of a question. Drives both the input affordance and grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Single,
    Multiple,
    Text,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Single => "single",
            QuestionKind::Multiple => "multiple",
            QuestionKind::Text => "text",
        }
    }

    /// Returns true for kinds answered by picking options.
    #[must_use]
    pub fn has_options(self) -> bool {
        matches!(self, QuestionKind::Single | QuestionKind::Multiple)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected answer for a question, one variant per `QuestionKind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// The correct option, given as its text.
    Single { correct_answer: String },
    /// Indices of every option that must be selected.
    Multiple { correct_answers: BTreeSet<usize> },
    /// Target string, compared trimmed and case-insensitively.
    Text { correct_answer: String },
}

impl AnswerKey {
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerKey::Single { .. } => QuestionKind::Single,
            AnswerKey::Multiple { .. } => QuestionKind::Multiple,
            AnswerKey::Text { .. } => QuestionKind::Text,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz question with its answer key.
///
/// Immutable once built. Only the structure needed for grading is validated:
/// choice questions must carry options, and multi-choice key indices must
/// address existing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    key: AnswerKey,
    points: u32,
    explanation: Option<String>,
}

impl Question {
    /// Builds a question from its parts.
    ///
    /// Text questions drop any provided options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingOptions` when a choice question has no options,
    /// or `QuestionError::KeyOutOfRange` when a multi-choice key index has no option.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        key: AnswerKey,
    ) -> Result<Self, QuestionError> {
        let kind = key.kind();
        let options = if kind.has_options() {
            if options.is_empty() {
                return Err(QuestionError::MissingOptions { kind });
            }
            options
        } else {
            Vec::new()
        };

        if let AnswerKey::Multiple { correct_answers } = &key {
            if let Some(&index) = correct_answers.iter().find(|&&i| i >= options.len()) {
                return Err(QuestionError::KeyOutOfRange {
                    index,
                    options: options.len(),
                });
            }
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            key,
            points: 0,
            explanation: None,
        })
    }

    /// Single-choice question whose key is the text of the correct option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingOptions` if `options` is empty.
    pub fn single(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        Self::new(
            id,
            prompt,
            options,
            AnswerKey::Single {
                correct_answer: correct_answer.into(),
            },
        )
    }

    /// Multi-choice question keyed by option indices.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if options are missing or an index is out of range.
    pub fn multiple(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answers: impl IntoIterator<Item = usize>,
    ) -> Result<Self, QuestionError> {
        Self::new(
            id,
            prompt,
            options,
            AnswerKey::Multiple {
                correct_answers: correct_answers.into_iter().collect(),
            },
        )
    }

    /// Free-text question.
    #[must_use]
    pub fn text(id: QuestionId, prompt: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options: Vec::new(),
            key: AnswerKey::Text {
                correct_answer: correct_answer.into(),
            },
            points: 0,
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        self.explanation = if explanation.trim().is_empty() {
            None
        } else {
            Some(explanation)
        };
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.key.kind()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Index of the correct option for a single-choice question.
    ///
    /// When `options` contains the key text more than once, the first match wins.
    /// Returns `None` for other kinds or when the key text is not among the options.
    #[must_use]
    pub fn correct_option_index(&self) -> Option<usize> {
        match &self.key {
            AnswerKey::Single { correct_answer } => {
                self.options.iter().position(|o| o == correct_answer)
            }
            AnswerKey::Multiple { .. } | AnswerKey::Text { .. } => None,
        }
    }

    /// Human-readable rendering of the expected answer, for result review.
    #[must_use]
    pub fn correct_answer_text(&self) -> String {
        match &self.key {
            AnswerKey::Single { correct_answer } | AnswerKey::Text { correct_answer } => {
                correct_answer.clone()
            }
            AnswerKey::Multiple { correct_answers } => correct_answers
                .iter()
                .filter_map(|&i| self.option(i))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn single_question_resolves_first_matching_option() {
        let q = Question::single(QuestionId::new(1), "Pick", opts(&["A", "B", "B"]), "B").unwrap();
        assert_eq!(q.kind(), QuestionKind::Single);
        assert_eq!(q.correct_option_index(), Some(1));
    }

    #[test]
    fn single_question_with_unknown_key_has_no_correct_index() {
        let q = Question::single(QuestionId::new(1), "Pick", opts(&["A", "B"]), "Z").unwrap();
        assert_eq!(q.correct_option_index(), None);
    }

    #[test]
    fn choice_question_requires_options() {
        let err = Question::single(QuestionId::new(1), "Pick", Vec::new(), "A").unwrap_err();
        assert_eq!(
            err,
            QuestionError::MissingOptions {
                kind: QuestionKind::Single
            }
        );
    }

    #[test]
    fn multiple_key_must_address_options() {
        let err =
            Question::multiple(QuestionId::new(1), "Pick", opts(&["A", "B"]), [0, 2]).unwrap_err();
        assert_eq!(err, QuestionError::KeyOutOfRange { index: 2, options: 2 });
    }

    #[test]
    fn text_question_drops_options_and_defaults_points() {
        let q = Question::new(
            QuestionId::new(3),
            "Capital of France?",
            opts(&["ignored"]),
            AnswerKey::Text {
                correct_answer: "Paris".into(),
            },
        )
        .unwrap();
        assert!(q.options().is_empty());
        assert_eq!(q.points(), 0);
        assert_eq!(q.explanation(), None);
    }

    #[test]
    fn correct_answer_text_lists_multiple_options() {
        let q = Question::multiple(QuestionId::new(4), "Pick", opts(&["A", "B", "C"]), [2, 0])
            .unwrap()
            .with_points(5)
            .with_explanation("  ");
        assert_eq!(q.correct_answer_text(), "A, C");
        assert_eq!(q.points(), 5);
        assert_eq!(q.explanation(), None);
    }
}

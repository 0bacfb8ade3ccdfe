use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::question::{Question, QuestionKind};

/// The user's current response to one question.
///
/// The non-empty variants correspond one-to-one with `QuestionKind`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Answer {
    #[default]
    None,
    SingleIndex(usize),
    MultiIndices(BTreeSet<usize>),
    Text(String),
}

impl Answer {
    /// Builds a multi-choice answer; an empty selection collapses to `Answer::None`.
    #[must_use]
    pub fn multi(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::MultiIndices(indices.into_iter().collect()).normalized()
    }

    /// Builds a trimmed text answer; blank input collapses to `Answer::None`.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into()).normalized()
    }

    /// Trims text and collapses empty selections and blank text to `Answer::None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Answer::MultiIndices(set) if set.is_empty() => Answer::None,
            Answer::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Answer::None
                } else if trimmed.len() == text.len() {
                    Answer::Text(text)
                } else {
                    Answer::Text(trimmed.to_owned())
                }
            }
            other => other,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Answer::None)
    }

    /// Question kind this answer belongs to; `None` fits every kind.
    #[must_use]
    pub fn kind(&self) -> Option<QuestionKind> {
        match self {
            Answer::None => None,
            Answer::SingleIndex(_) => Some(QuestionKind::Single),
            Answer::MultiIndices(_) => Some(QuestionKind::Multiple),
            Answer::Text(_) => Some(QuestionKind::Text),
        }
    }

    /// Whether option `index` is currently selected.
    #[must_use]
    pub fn selects(&self, index: usize) -> bool {
        match self {
            Answer::SingleIndex(i) => *i == index,
            Answer::MultiIndices(set) => set.contains(&index),
            Answer::None | Answer::Text(_) => false,
        }
    }

    /// Renders the answer against the question's options for review screens.
    ///
    /// Returns `None` when unanswered. Unknown option indices render as `?`.
    #[must_use]
    pub fn display(&self, question: &Question) -> Option<String> {
        match self {
            Answer::None => None,
            Answer::SingleIndex(i) => Some(question.option(*i).unwrap_or("?").to_owned()),
            Answer::MultiIndices(set) => Some(
                set.iter()
                    .map(|&i| question.option(i).unwrap_or("?"))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Answer::Text(text) => Some(text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    #[test]
    fn empty_selection_collapses_to_none() {
        assert_eq!(Answer::multi(Vec::new()), Answer::None);
        assert_eq!(Answer::text("   "), Answer::None);
        assert_eq!(Answer::multi([2, 0]), Answer::MultiIndices([0, 2].into()));
    }

    #[test]
    fn text_is_stored_trimmed() {
        assert_eq!(Answer::text("  paris \n"), Answer::Text("paris".into()));
        assert_eq!(
            Answer::Text("New York ".into()).normalized(),
            Answer::Text("New York".into())
        );
    }

    #[test]
    fn selects_reports_option_state() {
        assert!(Answer::SingleIndex(1).selects(1));
        assert!(!Answer::SingleIndex(1).selects(0));
        assert!(Answer::multi([0, 2]).selects(2));
        assert!(!Answer::text("x").selects(0));
    }

    #[test]
    fn display_uses_option_text() {
        let q = Question::multiple(
            QuestionId::new(1),
            "Pick",
            vec!["A".into(), "B".into(), "C".into()],
            [0],
        )
        .unwrap();
        assert_eq!(Answer::multi([2, 0]).display(&q).as_deref(), Some("A, C"));
        assert_eq!(Answer::SingleIndex(7).display(&q).as_deref(), Some("?"));
        assert_eq!(Answer::None.display(&q), None);
    }
}

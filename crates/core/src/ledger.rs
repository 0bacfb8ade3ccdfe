//! Per-position answer storage for a running quiz.

use crate::error::QuizError;
use crate::model::{Answer, Question, QuestionKind};

static UNANSWERED: Answer = Answer::None;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    kind: QuestionKind,
    options: usize,
    answer: Answer,
}

/// Current answer for every sampled question, indexed by position.
///
/// The ledger is sized once from the sampled questions and remembers each
/// question's kind and option count so writes can be checked without holding
/// on to the questions themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    slots: Vec<Slot>,
}

impl AnswerLedger {
    /// Creates an empty ledger with one unanswered slot per question.
    #[must_use]
    pub fn for_questions(questions: &[Question]) -> Self {
        let slots = questions
            .iter()
            .map(|q| Slot {
                kind: q.kind(),
                options: q.options().len(),
                answer: Answer::None,
            })
            .collect();
        Self { slots }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Checks that `answer` could be stored at `position`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPosition` for positions outside the ledger,
    /// `QuizError::TypeMismatch` when the variant does not fit the question kind,
    /// and `QuizError::OptionOutOfRange` for option indices the question lacks.
    pub fn check(&self, position: usize, answer: &Answer) -> Result<(), QuizError> {
        let slot = self.slots.get(position).ok_or(QuizError::InvalidPosition {
            position,
            len: self.slots.len(),
        })?;

        if let Some(found) = answer.kind() {
            if found != slot.kind {
                return Err(QuizError::TypeMismatch {
                    position,
                    expected: slot.kind,
                    found,
                });
            }
        }

        let out_of_range = match answer {
            Answer::SingleIndex(i) => (*i >= slot.options).then_some(*i),
            Answer::MultiIndices(set) => set.iter().copied().find(|&i| i >= slot.options),
            Answer::None | Answer::Text(_) => None,
        };
        if let Some(index) = out_of_range {
            return Err(QuizError::OptionOutOfRange {
                position,
                index,
                options: slot.options,
            });
        }

        Ok(())
    }

    /// Overwrites the answer at `position`.
    ///
    /// Empty multi-selections and blank text are stored as `Answer::None`.
    ///
    /// # Errors
    ///
    /// See [`AnswerLedger::check`].
    pub fn set(&mut self, position: usize, answer: Answer) -> Result<(), QuizError> {
        let answer = answer.normalized();
        self.check(position, &answer)?;
        self.slots[position].answer = answer;
        Ok(())
    }

    /// Current answer at `position`; `Answer::None` when unset or out of range.
    #[must_use]
    pub fn get(&self, position: usize) -> &Answer {
        self.slots.get(position).map_or(&UNANSWERED, |s| &s.answer)
    }

    /// Iterates answers in position order.
    pub fn answers(&self) -> impl Iterator<Item = &Answer> {
        self.slots.iter().map(|s| &s.answer)
    }

    /// Number of positions holding a non-empty answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.answer.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn questions() -> Vec<Question> {
        vec![
            Question::single(
                QuestionId::new(1),
                "single",
                vec!["A".into(), "B".into(), "C".into()],
                "B",
            )
            .unwrap(),
            Question::multiple(
                QuestionId::new(2),
                "multiple",
                vec!["A".into(), "B".into(), "C".into()],
                [0, 2],
            )
            .unwrap(),
            Question::text(QuestionId::new(3), "text", "Paris"),
        ]
    }

    #[test]
    fn starts_unanswered_and_sized_to_questions() {
        let ledger = AnswerLedger::for_questions(&questions());
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.answered_count(), 0);
        assert!(ledger.answers().all(Answer::is_none));
        assert_eq!(ledger.get(99), &Answer::None);
    }

    #[test]
    fn set_overwrites_previous_answer() {
        let mut ledger = AnswerLedger::for_questions(&questions());
        ledger.set(0, Answer::SingleIndex(0)).unwrap();
        ledger.set(0, Answer::SingleIndex(2)).unwrap();
        assert_eq!(ledger.get(0), &Answer::SingleIndex(2));
        assert_eq!(ledger.answered_count(), 1);
    }

    #[test]
    fn set_rejects_mismatched_variant() {
        let mut ledger = AnswerLedger::for_questions(&questions());
        let err = ledger.set(2, Answer::SingleIndex(0)).unwrap_err();
        assert_eq!(
            err,
            QuizError::TypeMismatch {
                position: 2,
                expected: QuestionKind::Text,
                found: QuestionKind::Single,
            }
        );
        assert_eq!(ledger.get(2), &Answer::None);
    }

    #[test]
    fn set_rejects_unknown_option_and_position() {
        let mut ledger = AnswerLedger::for_questions(&questions());
        assert!(matches!(
            ledger.set(1, Answer::multi([0, 5])),
            Err(QuizError::OptionOutOfRange { index: 5, .. })
        ));
        assert!(matches!(
            ledger.set(3, Answer::None),
            Err(QuizError::InvalidPosition { position: 3, len: 3 })
        ));
    }

    #[test]
    fn empty_multi_selection_clears_the_slot() {
        let mut ledger = AnswerLedger::for_questions(&questions());
        ledger.set(1, Answer::multi([0])).unwrap();
        ledger.set(1, Answer::MultiIndices(Default::default())).unwrap();
        assert_eq!(ledger.get(1), &Answer::None);
    }

    #[test]
    fn none_is_accepted_for_any_kind() {
        let mut ledger = AnswerLedger::for_questions(&questions());
        for position in 0..3 {
            ledger.set(position, Answer::None).unwrap();
        }
        assert_eq!(ledger.answered_count(), 0);
    }
}

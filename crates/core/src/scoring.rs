//! Grading of a finished quiz.

use crate::ledger::AnswerLedger;
use crate::model::{Answer, AnswerKey, Question, QuizResult, ReviewItem};

/// Grades every sampled question against the ledger.
///
/// Pure: the ledger is only read, so calling this twice yields equal results.
/// Positions missing from the ledger grade as unanswered.
#[must_use]
pub fn grade(questions: &[Question], ledger: &AnswerLedger) -> QuizResult {
    let review = questions
        .iter()
        .enumerate()
        .map(|(position, question)| {
            let user_answer = ledger.get(position).clone();
            let is_correct = is_correct(question, &user_answer);
            ReviewItem {
                position,
                question: question.clone(),
                user_answer,
                is_correct,
                awarded_points: if is_correct { question.points() } else { 0 },
            }
        })
        .collect();

    QuizResult::from_review(review)
}

/// Exact-correctness check for one answer.
#[must_use]
pub fn is_correct(question: &Question, answer: &Answer) -> bool {
    match (question.key(), answer) {
        (AnswerKey::Single { .. }, Answer::SingleIndex(index)) => {
            question.correct_option_index() == Some(*index)
        }
        (AnswerKey::Multiple { correct_answers }, Answer::MultiIndices(selected)) => {
            selected == correct_answers
        }
        (AnswerKey::Text { correct_answer }, Answer::Text(given)) => {
            text_matches(given, correct_answer)
        }
        _ => false,
    }
}

// Only the user's input is trimmed; the key is compared as authored.
fn text_matches(given: &str, expected: &str) -> bool {
    let given = given.trim();
    !given.is_empty() && given.to_lowercase() == expected.to_lowercase()
}

//! Question pool loading from the JSON question-file format.
//!
//! The file is an array of records:
//!
//! ```json
//! [
//!   { "question": "2 + 2?", "type": "single", "options": ["3", "4"], "correctAnswer": "4", "points": 1 },
//!   { "question": "Primes?", "type": "multiple", "options": ["2", "4", "5"], "correctAnswers": [0, 2] },
//!   { "question": "Capital of France?", "type": "text", "correctAnswer": "Paris", "explanation": "..." }
//! ]
//! ```
//!
//! Records without an `id` are numbered by their position, starting at 1.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use quiz_core::model::{AnswerKey, Question, QuestionId, QuestionKind};

use crate::error::PoolLoadError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    #[serde(default)]
    id: Option<u64>,
    question: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    correct_answers: Option<Vec<usize>>,
    #[serde(default)]
    points: Option<u32>,
    #[serde(default)]
    explanation: Option<String>,
}

impl QuestionRecord {
    fn into_question(self, index: usize) -> Result<Question, PoolLoadError> {
        let kind = self.kind;
        let missing = |field: &str| PoolLoadError::InvalidRecord {
            index,
            reason: format!("{kind} question is missing `{field}`"),
        };

        let key = match kind {
            QuestionKind::Single => AnswerKey::Single {
                correct_answer: self.correct_answer.ok_or_else(|| missing("correctAnswer"))?,
            },
            QuestionKind::Multiple => AnswerKey::Multiple {
                correct_answers: self
                    .correct_answers
                    .ok_or_else(|| missing("correctAnswers"))?
                    .into_iter()
                    .collect(),
            },
            QuestionKind::Text => AnswerKey::Text {
                correct_answer: self.correct_answer.ok_or_else(|| missing("correctAnswer"))?,
            },
        };

        let fallback_id = u64::try_from(index + 1).unwrap_or(u64::MAX);
        let id = QuestionId::new(self.id.unwrap_or(fallback_id));

        let mut question = Question::new(id, self.question, self.options, key)
            .map_err(|source| PoolLoadError::Question { index, source })?
            .with_points(self.points.unwrap_or(0));
        if let Some(explanation) = self.explanation {
            question = question.with_explanation(explanation);
        }
        Ok(question)
    }
}

/// Parses a JSON array of question records.
///
/// # Errors
///
/// Returns `PoolLoadError::Parse` for malformed JSON and
/// `PoolLoadError::InvalidRecord`/`PoolLoadError::Question` for records that
/// cannot be graded.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, PoolLoadError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_question(index))
        .collect()
}

/// Reads and parses a question file.
///
/// # Errors
///
/// Returns `PoolLoadError::Io` if the file cannot be read, otherwise see
/// [`parse_questions`].
pub fn load_questions(path: &Path) -> Result<Vec<Question>, PoolLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        error!(target: "quiz", path = %path.display(), error = %e, "failed to read question file");
        PoolLoadError::Io(e)
    })?;
    let questions = parse_questions(&raw).map_err(|e| {
        error!(target: "quiz", path = %path.display(), error = %e, "failed to parse question file");
        e
    })?;
    info!(target: "quiz", path = %path.display(), count = questions.len(), "loaded questions");
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "question": "2 + 2?", "type": "single", "options": ["3", "4"], "correctAnswer": "4", "points": 1 },
        { "id": 40, "question": "Primes?", "type": "multiple", "options": ["2", "4", "5"], "correctAnswers": [2, 0], "points": 2 },
        { "question": "Capital of France?", "type": "text", "correctAnswer": "Paris", "explanation": "Paris is the capital." }
    ]"#;

    #[test]
    fn parses_all_question_kinds() {
        let questions = parse_questions(SAMPLE).unwrap();
        assert_eq!(questions.len(), 3);

        assert_eq!(questions[0].id(), QuestionId::new(1));
        assert_eq!(questions[0].kind(), QuestionKind::Single);
        assert_eq!(questions[0].correct_option_index(), Some(1));

        assert_eq!(questions[1].id(), QuestionId::new(40));
        assert_eq!(
            questions[1].key(),
            &AnswerKey::Multiple {
                correct_answers: [0, 2].into()
            }
        );

        assert_eq!(questions[2].points(), 0);
        assert_eq!(questions[2].explanation(), Some("Paris is the capital."));
    }

    #[test]
    fn missing_key_is_reported_with_index() {
        let json = r#"[{ "question": "?", "type": "text" }]"#;
        let err = parse_questions(json).unwrap_err();
        assert!(matches!(err, PoolLoadError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn choice_question_without_options_is_rejected() {
        let json = r#"[{ "question": "?", "type": "single", "correctAnswer": "A" }]"#;
        let err = parse_questions(json).unwrap_err();
        assert!(matches!(err, PoolLoadError::Question { index: 0, .. }));
    }

    #[test]
    fn unknown_type_is_a_parse_error() {
        let json = r#"[{ "question": "?", "type": "essay", "correctAnswer": "A" }]"#;
        assert!(matches!(parse_questions(json), Err(PoolLoadError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_questions(Path::new("/definitely/not/here/questions.json")).unwrap_err();
        assert!(matches!(err, PoolLoadError::Io(_)));
    }
}

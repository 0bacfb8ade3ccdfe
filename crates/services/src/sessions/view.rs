use quiz_core::model::{Answer, Question, QuestionId, QuestionKind, SessionId};

use super::progress::SessionProgress;
use super::service::{QuizSession, SessionPhase};

/// Owned copy of what a quiz screen needs to render.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The UI decides how to show the countdown and the low-time warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub session_id: Option<SessionId>,
    pub progress: SessionProgress,
    pub time_remaining: u32,
    pub is_low_time: bool,
    pub question: Option<QuestionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    pub prompt: String,
    pub kind: QuestionKind,
    pub points: u32,
    /// Empty for text questions.
    pub options: Vec<OptionView>,
    /// Current text input, pending or committed.
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub text: String,
    pub selected: bool,
}

impl QuestionView {
    fn from_question(question: &Question, answer: &Answer) -> Self {
        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| OptionView {
                index,
                text: text.clone(),
                selected: answer.selects(index),
            })
            .collect();
        let text = match answer {
            Answer::Text(value) => Some(value.clone()),
            _ => None,
        };

        Self {
            id: question.id(),
            prompt: question.prompt().to_owned(),
            kind: question.kind(),
            points: question.points(),
            options,
            text,
        }
    }
}

impl QuizSession {
    /// Captures the current question, selection state and countdown.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let time_remaining = self.time_remaining();
        let in_progress = self.phase() == SessionPhase::InProgress;
        SessionSnapshot {
            phase: self.phase(),
            session_id: self.id(),
            progress: self.progress(),
            time_remaining,
            is_low_time: in_progress && self.settings().is_low_time(time_remaining),
            question: self
                .current_question()
                .map(|question| QuestionView::from_question(question, self.current_answer())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizSettings;
    use quiz_core::QuestionPool;
    use quiz_core::time::fixed_clock;

    fn session() -> QuizSession {
        let pool = QuestionPool::new(vec![
            Question::multiple(
                QuestionId::new(1),
                "Primes?",
                vec!["2".into(), "4".into(), "5".into()],
                [0, 2],
            )
            .unwrap()
            .with_points(2),
        ]);
        QuizSession::new(pool, QuizSettings::with_limits(5, 12).unwrap(), fixed_clock())
    }

    #[test]
    fn idle_snapshot_has_no_question() {
        let snapshot = session().snapshot();
        assert_eq!(snapshot.phase, SessionPhase::NotStarted);
        assert!(snapshot.question.is_none());
        assert!(!snapshot.is_low_time);
    }

    #[test]
    fn snapshot_reflects_selection() {
        let mut session = session();
        session.start().unwrap();
        session.select_option(2).unwrap();

        let snapshot = session.snapshot();
        let question = snapshot.question.unwrap();
        assert_eq!(question.prompt, "Primes?");
        let selected: Vec<bool> = question.options.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, false, true]);
        assert_eq!(snapshot.progress.answered, 1);
        assert_eq!(snapshot.time_remaining, 12);
    }

    #[test]
    fn low_time_flag_follows_threshold() {
        let mut session = session();
        session.start().unwrap();
        session.tick();
        assert!(!session.snapshot().is_low_time);
        session.tick();
        assert!(session.snapshot().is_low_time);
    }
}

use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use tracing::{debug, info, warn};

use quiz_core::model::{
    Answer, Question, QuestionKind, QuizResult, QuizSettings, ResultRecord, SessionId,
};
use quiz_core::{AnswerLedger, Clock, CountdownTimer, QuestionPool, QuizError, TimerEvent, grade};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASE & EVENTS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Finished,
}

/// What a scheduler tick did to the session, so callers know what to re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// No quiz running, or the timer was stopped.
    Idle,
    /// One second elapsed on the current question.
    Tick { remaining: u32 },
    /// Time ran out and the session moved to `position`.
    Advanced { position: usize },
    /// Time ran out on the last question and the quiz was graded.
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A timed quiz run over questions sampled from a pool.
///
/// Owns every piece of mutable quiz state: the sampled questions, the current
/// position, the answer ledger, the countdown and the cached result. Manual
/// navigation and timer expiry share the same private transitions
/// (`move_to`, `complete`), and both stop the countdown before touching the
/// position.
pub struct QuizSession {
    pool: QuestionPool,
    settings: QuizSettings,
    clock: Clock,
    phase: SessionPhase,
    id: Option<SessionId>,
    questions: Vec<Question>,
    ledger: AnswerLedger,
    position: usize,
    pending: Option<Answer>,
    timer: CountdownTimer,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<QuizResult>,
    recorded: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(pool: QuestionPool, settings: QuizSettings, clock: Clock) -> Self {
        Self {
            pool,
            settings,
            clock,
            phase: SessionPhase::NotStarted,
            id: None,
            questions: Vec::new(),
            ledger: AnswerLedger::default(),
            position: 0,
            pending: None,
            timer: CountdownTimer::new(),
            started_at: None,
            completed_at: None,
            result: None,
            recorded: false,
        }
    }

    /// Samples a fresh set of questions and starts the first countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyInProgress` while a quiz is running and
    /// `SessionError::EmptyPool` when there is nothing to ask.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.start_with(&mut rand::rng())
    }

    /// Same as [`QuizSession::start`] with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::start`].
    pub fn start_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        if self.phase == SessionPhase::InProgress {
            return Err(SessionError::AlreadyInProgress);
        }
        if self.pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        let count = usize::try_from(self.settings.questions_per_quiz()).unwrap_or(usize::MAX);
        let questions = self.pool.sample_with(count, rng)?;

        let id = SessionId::random();
        self.ledger = AnswerLedger::for_questions(&questions);
        self.questions = questions;
        self.position = 0;
        self.pending = None;
        self.id = Some(id);
        self.started_at = Some(self.clock.now());
        self.completed_at = None;
        self.result = None;
        self.recorded = false;
        self.phase = SessionPhase::InProgress;
        self.timer.restart(self.settings.seconds_per_question());

        info!(
            target: "quiz",
            session_id = %id,
            questions = self.questions.len(),
            pool = self.pool.len(),
            "quiz started"
        );
        Ok(())
    }

    /// Abandons the current run (finished or not) and starts a new one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when there is nothing to ask.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.restart_with(&mut rand::rng())
    }

    /// Same as [`QuizSession::restart`] with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::restart`].
    pub fn restart_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.timer.stop();
        self.phase = SessionPhase::NotStarted;
        self.start_with(rng)
    }

    /// Leaves the results screen. The finished run is dropped from memory.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` unless the quiz has finished.
    pub fn back_to_home(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Finished {
            return Err(SessionError::NotFinished);
        }
        self.phase = SessionPhase::NotStarted;
        self.questions.clear();
        self.ledger = AnswerLedger::default();
        self.position = 0;
        self.pending = None;
        self.result = None;
        Ok(())
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Stores `answer` for the current question, replacing any pending input.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside a running quiz, or the
    /// ledger's validation error when the answer does not fit the question.
    pub fn record_answer(&mut self, answer: Answer) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.ledger.set(self.position, answer)?;
        self.pending = None;
        Ok(())
    }

    /// Clicks option `index` on the current question.
    ///
    /// Single-choice replaces the selection; multi-choice toggles `index`, and
    /// deselecting the last option leaves the question unanswered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::TypeMismatch` on a text question, or
    /// `QuizError::OptionOutOfRange` for an unknown option.
    pub fn select_option(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let answer = match self.current_kind() {
            Some(QuestionKind::Single) => Answer::SingleIndex(index),
            Some(QuestionKind::Multiple) => {
                let mut selected = match self.ledger.get(self.position) {
                    Answer::MultiIndices(set) => set.clone(),
                    _ => Default::default(),
                };
                if !selected.remove(&index) {
                    selected.insert(index);
                }
                Answer::MultiIndices(selected)
            }
            Some(QuestionKind::Text) | None => {
                return Err(QuizError::TypeMismatch {
                    position: self.position,
                    expected: self.current_kind().unwrap_or(QuestionKind::Text),
                    found: QuestionKind::Single,
                }
                .into());
            }
        };
        self.record_answer(answer)
    }

    /// Holds typed text for the current question without committing it.
    ///
    /// Pending text is written to the ledger when the session navigates,
    /// finishes, or the countdown expires.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::TypeMismatch` unless the current question is a text question.
    pub fn stage_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let answer = Answer::Text(text.into()).normalized();
        self.ledger.check(self.position, &answer)?;
        self.pending = Some(answer);
        Ok(())
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Moves to the previous question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPosition` on the first question.
    pub fn go_to_previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_in_progress()?;
        let Some(target) = self.position.checked_sub(1) else {
            return Err(QuizError::InvalidPosition {
                position: self.position,
                len: self.questions.len(),
            }
            .into());
        };
        self.move_to(target);
        Ok(self.position)
    }

    /// Moves to the next question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPosition` on the last question.
    pub fn go_to_next(&mut self) -> Result<usize, SessionError> {
        self.ensure_in_progress()?;
        let target = self.position + 1;
        if target >= self.questions.len() {
            return Err(QuizError::InvalidPosition {
                position: target,
                len: self.questions.len(),
            }
            .into());
        }
        self.move_to(target);
        Ok(self.position)
    }

    /// Ends the quiz and grades it. Allowed from any question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside a running quiz.
    pub fn finish(&mut self) -> Result<&QuizResult, SessionError> {
        self.ensure_in_progress()?;
        self.complete();
        self.result.as_ref().ok_or(SessionError::NotFinished)
    }

    /// Advances the countdown by one second; called by the external scheduler.
    ///
    /// On expiry the session behaves exactly like `go_to_next`, or like
    /// `finish` on the last question. Never fails.
    pub fn tick(&mut self) -> SessionEvent {
        if self.phase != SessionPhase::InProgress {
            return SessionEvent::Idle;
        }

        match self.timer.tick() {
            TimerEvent::Idle => SessionEvent::Idle,
            TimerEvent::Tick { remaining } => SessionEvent::Tick { remaining },
            TimerEvent::Expired => {
                debug!(target: "quiz", position = self.position, "time is up");
                if self.position + 1 < self.questions.len() {
                    self.move_to(self.position + 1);
                    SessionEvent::Advanced {
                        position: self.position,
                    }
                } else {
                    self.complete();
                    SessionEvent::Finished
                }
            }
        }
    }

    fn move_to(&mut self, target: usize) {
        self.timer.stop();
        self.commit_pending();
        debug!(target: "quiz", from = self.position, to = target, "navigating");
        self.position = target;
        self.timer.start(self.settings.seconds_per_question());
    }

    fn complete(&mut self) {
        self.timer.stop();
        self.commit_pending();

        let result = grade(&self.questions, &self.ledger);
        info!(
            target: "quiz",
            session_id = ?self.id,
            score = result.total_score(),
            correct = result.correct_count(),
            incorrect = result.incorrect_count(),
            "quiz finished"
        );
        self.completed_at = Some(self.clock.now());
        self.result = Some(result);
        self.phase = SessionPhase::Finished;
    }

    fn commit_pending(&mut self) {
        if let Some(answer) = self.pending.take() {
            // Pending answers are checked when staged, so this cannot fail for a live session.
            if let Err(err) = self.ledger.set(self.position, answer) {
                warn!(target: "quiz", position = self.position, error = %err, "dropped pending answer");
            }
        }
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::InProgress {
            Ok(())
        } else {
            Err(SessionError::NotInProgress)
        }
    }

    fn current_kind(&self) -> Option<QuestionKind> {
        self.current_question().map(Question::kind)
    }

    //
    // ─── READ ACCESS ───────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn id(&self) -> Option<SessionId> {
        self.id
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == SessionPhase::InProgress {
            self.questions.get(self.position)
        } else {
            None
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    #[must_use]
    pub fn timer_generation(&self) -> u64 {
        self.timer.generation()
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    #[must_use]
    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    /// Committed answer at `position`.
    #[must_use]
    pub fn answer_at(&self, position: usize) -> &Answer {
        self.ledger.get(position)
    }

    /// Answer shown for the current question: pending input first, then the ledger.
    #[must_use]
    pub fn current_answer(&self) -> &Answer {
        self.pending
            .as_ref()
            .unwrap_or_else(|| self.ledger.get(self.position))
    }

    /// Whether option `index` is selected on the current question.
    #[must_use]
    pub fn option_selected(&self, index: usize) -> bool {
        self.current_answer().selects(index)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Minimal record of the finished run for persistence.
    #[must_use]
    pub fn result_record(&self) -> Option<ResultRecord> {
        let (id, result, completed_at) = (self.id?, self.result.as_ref()?, self.completed_at?);
        Some(ResultRecord::from_result(id, result, completed_at))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            position: self.position,
            answered: self.ledger.answered_count(),
            is_complete: self.is_finished(),
        }
    }

    pub(crate) fn is_recorded(&self) -> bool {
        self.recorded
    }

    pub(crate) fn mark_recorded(&mut self) {
        self.recorded = true;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("time_remaining", &self.timer.remaining())
            .field("answered", &self.ledger.answered_count())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

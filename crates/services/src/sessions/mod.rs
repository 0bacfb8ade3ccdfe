mod progress;
mod service;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{QuizSession, SessionEvent, SessionPhase};
pub use view::{OptionView, QuestionView, SessionSnapshot};
pub use workflow::{PoolState, QuizOutcome, QuizService};

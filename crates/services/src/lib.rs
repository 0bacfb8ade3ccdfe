#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod pool_loader;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{AppServicesError, PoolLoadError, SessionError};
pub use pool_loader::{load_questions, parse_questions};

pub use sessions::{
    OptionView, PoolState, QuestionView, QuizOutcome, QuizService, QuizSession, SessionEvent,
    SessionPhase, SessionProgress, SessionSnapshot,
};

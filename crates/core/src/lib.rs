#![forbid(unsafe_code)]

pub mod error;
pub mod ledger;
pub mod model;
pub mod pool;
pub mod scoring;
pub mod time;
pub mod timer;

pub use error::QuizError;
pub use ledger::AnswerLedger;
pub use pool::QuestionPool;
pub use scoring::grade;
pub use time::Clock;
pub use timer::{CountdownTimer, TimerEvent};

mod answer;
mod ids;
mod question;
mod result;
mod settings;

pub use answer::Answer;
pub use ids::{ParseIdError, QuestionId, SessionId};
pub use question::{AnswerKey, Question, QuestionError, QuestionKind};
pub use result::{QuizResult, ResultRecord, ReviewItem};
pub use settings::{QuizSettings, SettingsError};

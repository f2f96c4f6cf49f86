mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use service::{Choice, QUESTION_TIME_LIMIT_SECS, Question, QuizSession, question_time_limit};
pub use workflow::{AnswerResult, QuestionOutcome, SessionLoopService};

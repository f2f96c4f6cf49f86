#![forbid(unsafe_code)]

pub mod error;
pub mod gateway;
pub mod loader;
pub mod schedule;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{LoadError, MutationError, ScheduleError, SessionError};
pub use gateway::{HttpMutationGateway, MutationGateway};
pub use loader::{FsPairStore, HttpPairStore, ManifestEntry, PairStore};
pub use schedule::{Draw, ScheduleService};
pub use sessions::{
    AnswerResult, Choice, QUESTION_TIME_LIMIT_SECS, Question, QuestionOutcome, QuizSession,
    SessionLoopService, question_time_limit,
};

#![forbid(unsafe_code)]

pub mod error;
pub mod generative;
pub mod payload;
pub mod question_source;
pub mod quiz;

pub use error::QuestionSourceError;
pub use generative::{GenerativeQuestionSource, QuestionSourceConfig, parse_timeout_secs};
pub use payload::parse_questions;
pub use question_source::{QuestionSource, StaticQuestionSource};
pub use quiz::{DEFAULT_FEEDBACK_DELAY, QuizController};

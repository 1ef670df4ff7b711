#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod shuffle;

pub use model::{Question, QuestionError, Topic, TopicParseError};
pub use session::{
    AdvanceOutcome, AdvanceTicket, FETCH_FAILED_MESSAGE, FetchTicket, QUESTIONS_PER_QUIZ,
    QuestionView, QuizPhase, QuizSession, SessionSnapshot, TransitionError,
};
pub use shuffle::shuffle_options;

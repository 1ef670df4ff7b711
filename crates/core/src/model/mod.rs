mod question;
mod topic;

pub use question::{Question, QuestionError};
pub use topic::{Topic, TopicParseError};

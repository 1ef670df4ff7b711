mod controller;

pub use controller::{DEFAULT_FEEDBACK_DELAY, QuizController};

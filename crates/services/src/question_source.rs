use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_core::{Question, Topic};

use crate::error::QuestionSourceError;

/// Produces the questions for one quiz.
///
/// Implementations must return exactly `quiz_core::QUESTIONS_PER_QUIZ`
/// validated questions or an error; the session treats anything else as a
/// failed fetch.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self, topic: Topic) -> Result<Vec<Question>, QuestionSourceError>;
}

/// Source that answers every request with the same fixed questions.
#[derive(Debug, Default)]
pub struct StaticQuestionSource {
    questions: Option<Vec<Question>>,
    calls: AtomicUsize,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Some(questions),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose every request fails with `EmptyResponse`.
    #[must_use]
    pub fn failing() -> Self {
        Self::default()
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch_questions(&self, _topic: Topic) -> Result<Vec<Question>, QuestionSourceError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        self.questions
            .clone()
            .ok_or(QuestionSourceError::EmptyResponse)
    }
}

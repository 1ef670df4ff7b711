//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuestionError;

/// Errors emitted by a `QuestionSource`.
///
/// Every variant ends in the same user-facing state; the distinction only
/// matters for logs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question source is not configured")]
    Disabled,
    #[error("question source returned an empty response")]
    EmptyResponse,
    #[error("question source request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question payload is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected {expected} questions, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

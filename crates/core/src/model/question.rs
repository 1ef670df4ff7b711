use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyText,

    #[error("expected {expected} options, got {actual}")]
    OptionCount { expected: usize, actual: usize },

    #[error("option {index} must not be empty")]
    EmptyOption { index: usize },

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct option {0:?} is not one of the options")]
    CorrectOptionMissing(String),
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly four distinct options.
///
/// The correct answer is stored by value, so reordering options never
/// changes which answer is correct. Deserializing goes through
/// `Question::new`, so a decoded question holds the same guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionFields")]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: String,
}

#[derive(Deserialize)]
struct QuestionFields {
    text: String,
    options: Vec<String>,
    correct_option: String,
}

impl TryFrom<QuestionFields> for Question {
    type Error = QuestionError;

    fn try_from(fields: QuestionFields) -> Result<Self, Self::Error> {
        Self::new(fields.text, fields.options, fields.correct_option)
    }
}

impl Question {
    pub const OPTION_COUNT: usize = 4;

    /// Build a validated question.
    ///
    /// Text, options and `correct_option` are trimmed before they are
    /// compared, so `" 4"` matches the option `"4 "`. This leniency is
    /// deliberate; after construction every comparison is exact.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, the option count is not
    /// `OPTION_COUNT`, an option is blank or repeated, or `correct_option` is
    /// not among the options.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if options.len() != Self::OPTION_COUNT {
            return Err(QuestionError::OptionCount {
                expected: Self::OPTION_COUNT,
                actual: options.len(),
            });
        }

        let options: Vec<String> = options
            .into_iter()
            .map(|option| option.trim().to_string())
            .collect();

        let mut seen = HashSet::with_capacity(options.len());
        for (index, option) in options.iter().enumerate() {
            if option.is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        let correct_option = correct_option.into().trim().to_string();
        if !seen.contains(correct_option.as_str()) {
            return Err(QuestionError::CorrectOptionMissing(correct_option));
        }

        Ok(Self {
            text,
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }

    #[must_use]
    pub fn is_correct(&self, value: &str) -> bool {
        self.correct_option == value
    }

    pub(crate) fn options_mut(&mut self) -> &mut [String] {
        &mut self.options
    }
}

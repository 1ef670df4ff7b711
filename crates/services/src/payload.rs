//! Decoding of generated question payloads.
//!
//! The generator is asked for JSON, but models often wrap it in a Markdown
//! code fence or nest the list under a `questions` key. Both are accepted;
//! everything else is a `QuestionSourceError`.

use serde::Deserialize;

use quiz_core::{QUESTIONS_PER_QUIZ, Question};

use crate::error::QuestionSourceError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionPayload {
    Wrapped { questions: Vec<WireQuestion> },
    Bare(Vec<WireQuestion>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: String,
}

/// Parse generated content into exactly `QUESTIONS_PER_QUIZ` questions.
///
/// # Errors
///
/// Returns `QuestionSourceError::Malformed` for unparsable JSON or missing
/// fields, `WrongCount` when the list does not hold exactly five items and
/// `InvalidQuestion` when an item fails `Question` validation.
pub fn parse_questions(content: &str) -> Result<Vec<Question>, QuestionSourceError> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        return Err(QuestionSourceError::EmptyResponse);
    }

    let items = match serde_json::from_str::<QuestionPayload>(body)? {
        QuestionPayload::Wrapped { questions } | QuestionPayload::Bare(questions) => questions,
    };

    if items.len() != QUESTIONS_PER_QUIZ {
        return Err(QuestionSourceError::WrongCount {
            expected: QUESTIONS_PER_QUIZ,
            actual: items.len(),
        });
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Question::new(item.question, item.options, item.correct_answer)
                .map_err(|source| QuestionSourceError::InvalidQuestion { index, source })
        })
        .collect()
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

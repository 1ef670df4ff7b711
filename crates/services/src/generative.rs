use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::{QUESTIONS_PER_QUIZ, Question, Topic};

use crate::error::QuestionSourceError;
use crate::payload::parse_questions;
use crate::question_source::QuestionSource;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct QuestionSourceConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl QuestionSourceConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `QUIZ_AI_*` variables. Returns `None` without an API key.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("QUIZ_AI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = env::var("QUIZ_AI_MODEL") {
            config.model = model;
        }
        if let Some(timeout) = env::var("QUIZ_AI_TIMEOUT_SECS")
            .ok()
            .as_deref()
            .and_then(parse_timeout_secs)
        {
            config.timeout = timeout;
        }
        Some(config)
    }
}

/// Parse a request timeout in whole seconds. Zero is rejected because it
/// would fail every request.
#[must_use]
pub fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
    }
}

/// Question source backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GenerativeQuestionSource {
    client: Client,
    config: Option<QuestionSourceConfig>,
}

impl GenerativeQuestionSource {
    /// # Errors
    ///
    /// Returns `QuestionSourceError::Http` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, QuestionSourceError> {
        Self::new(QuestionSourceConfig::from_env())
    }

    /// # Errors
    ///
    /// Returns `QuestionSourceError::Http` if the HTTP client cannot be built.
    pub fn new(config: Option<QuestionSourceConfig>) -> Result<Self, QuestionSourceError> {
        let timeout = config.as_ref().map_or(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            |config| config.timeout,
        );
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.config.as_ref().map(|config| config.model.as_str())
    }

    async fn complete(
        &self,
        config: &QuestionSourceConfig,
        prompt: String,
    ) -> Result<String, QuestionSourceError> {
        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(QuestionSourceError::EmptyResponse)
    }
}

#[async_trait]
impl QuestionSource for GenerativeQuestionSource {
    async fn fetch_questions(&self, topic: Topic) -> Result<Vec<Question>, QuestionSourceError> {
        let config = self
            .config
            .as_ref()
            .ok_or(QuestionSourceError::Disabled)?;

        tracing::debug!(topic = %topic, model = %config.model, "requesting generated questions");
        let content = self.complete(config, build_prompt(topic)).await?;
        parse_questions(&content)
    }
}

fn build_prompt(topic: Topic) -> String {
    format!(
        "Generate {QUESTIONS_PER_QUIZ} multiple-choice quiz questions about {topic}. \
         Each question must have exactly {options} distinct answer options, and exactly one \
         of them is correct. Respond with JSON only, in the form \
         {{\"questions\": [{{\"question\": \"...\", \"options\": [\"...\", \"...\", \"...\", \"...\"], \
         \"correctAnswer\": \"...\"}}]}} where correctAnswer repeats one option verbatim.",
        options = Question::OPTION_COUNT,
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_topic_and_shape() {
        let prompt = build_prompt(Topic::GeneralKnowledge);
        assert!(prompt.contains("about General Knowledge"));
        assert!(prompt.contains("Generate 5 multiple-choice"));
        assert!(prompt.contains("exactly 4 distinct"));
        assert!(prompt.contains("\"correctAnswer\""));
    }

    #[test]
    fn config_defaults() {
        let config = QuestionSourceConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn timeout_must_be_positive_seconds() {
        assert_eq!(parse_timeout_secs(" 45 "), Some(Duration::from_secs(45)));
        assert_eq!(parse_timeout_secs("0"), None);
        assert_eq!(parse_timeout_secs("-3"), None);
        assert_eq!(parse_timeout_secs("soon"), None);
    }

    #[tokio::test]
    async fn unconfigured_source_is_disabled() {
        let source = GenerativeQuestionSource::new(None).unwrap();
        assert!(!source.enabled());

        let err = source.fetch_questions(Topic::Math).await.unwrap_err();
        assert!(matches!(err, QuestionSourceError::Disabled));
    }

    #[test]
    fn request_serializes_response_format_type() {
        let request = ChatRequest {
            model: "m".into(),
            messages: Vec::new(),
            temperature: 0.7,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
    }
}

//! Question service abstraction
//!
//! The interview only needs "given the transcript so far, what should we ask
//! next"; the wire format of the hosted model stays behind this trait.

mod error;
mod openrouter;

#[allow(unused_imports)] // Error kind is matched on by tests
pub use error::{QuestionError, QuestionErrorKind};
pub use openrouter::OpenRouterService;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "qwen/qwen-2.5-7b-instruct:free";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Source of follow-up questions
#[async_trait]
pub trait QuestionService: Send + Sync {
    /// Produce the next question for the transcript so far
    async fn next_question(&self, transcript: &[String]) -> Result<String, QuestionError>;

    /// Identifier of the backing model, for logs
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: QuestionService + ?Sized> QuestionService for Arc<T> {
    async fn next_question(&self, transcript: &[String]) -> Result<String, QuestionError> {
        (**self).next_question(transcript).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Configuration for the hosted question model
#[derive(Debug, Clone)]
pub struct QuestionConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    /// Sent as `HTTP-Referer`, used by `OpenRouter` for app attribution
    pub referer: String,
    /// Sent as `X-Title`
    pub title: String,
    pub timeout: Duration,
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: "https://your-website.com".to_string(),
            title: "Symptom Interview".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl QuestionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            endpoint: std::env::var("QUESTION_SERVICE_URL").unwrap_or(defaults.endpoint),
            model: std::env::var("QUESTION_MODEL").unwrap_or(defaults.model),
            referer: std::env::var("QUESTION_REFERER").unwrap_or(defaults.referer),
            title: std::env::var("QUESTION_TITLE").unwrap_or(defaults.title),
            timeout: std::env::var("QUESTION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }
}

/// Logging wrapper for question services
pub struct LoggingService {
    inner: Arc<dyn QuestionService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn QuestionService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl QuestionService for LoggingService {
    async fn next_question(&self, transcript: &[String]) -> Result<String, QuestionError> {
        let start = std::time::Instant::now();
        let result = self.inner.next_question(transcript).await;
        let duration = start.elapsed();

        match &result {
            Ok(question) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    transcript_len = transcript.len(),
                    question_chars = question.chars().count(),
                    "Question request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Question request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

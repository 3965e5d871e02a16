//! `OpenRouter` chat-completions implementation of the question service

use super::{QuestionConfig, QuestionError, QuestionService};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BOXED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\boxed\s*").expect("boxed marker pattern is valid"));

/// Question service backed by an `OpenAI`-compatible `chat/completions` endpoint
pub struct OpenRouterService {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterService {
    pub fn new(config: &QuestionConfig) -> Result<Self, QuestionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QuestionError::unexpected(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().unwrap_or_default(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    fn build_request(&self, transcript: &[String]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(transcript.join("\n")),
            }],
        }
    }

    fn extract_question(body: &str) -> Result<String, QuestionError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| QuestionError::protocol(format!("Failed to parse response: {e}")))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| QuestionError::protocol("No choices[0].message.content in response"))?;

        Ok(clean_reply(&content))
    }
}

#[async_trait]
impl QuestionService for OpenRouterService {
    async fn next_question(&self, transcript: &[String]) -> Result<String, QuestionError> {
        let request = self.build_request(transcript);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QuestionError::transport(format!("Request timeout: {e}"))
                } else if e.is_connect() || e.is_request() {
                    QuestionError::transport(format!("Connection failed: {e}"))
                } else {
                    QuestionError::unexpected(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QuestionError::transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_or(body, |resp| resp.error.message);
            return Err(QuestionError::http_status(status.as_u16(), message));
        }

        Self::extract_question(&body)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Strip `\boxed` markers and curly braces the model likes to wrap answers in
pub fn clean_reply(reply: &str) -> String {
    BOXED_MARKER
        .replace_all(reply, "")
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect::<String>()
        .trim()
        .to_string()
}

// Chat completions wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to start the interview
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub question_count: u32,
    pub symptoms: String,
}

/// Request to answer the current question
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// Response with the loaded model pairs
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub key: String,
    pub encoder: String,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

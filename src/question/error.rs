//! Question service error types

use thiserror::Error;

/// Question service error with classification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct QuestionError {
    pub kind: QuestionErrorKind,
    pub message: String,
}

impl QuestionError {
    pub fn new(kind: QuestionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(QuestionErrorKind::Transport, message)
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(QuestionErrorKind::HttpStatus(status), message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(QuestionErrorKind::Protocol, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(QuestionErrorKind::Unexpected, message)
    }

    /// Text shown in place of the question when the service fails
    pub fn display_message(&self) -> String {
        match self.kind {
            QuestionErrorKind::Transport => format!("⚠️ Connection error: {}", self.message),
            QuestionErrorKind::HttpStatus(status) => {
                format!("⛔ Server error (HTTP {status}): {}", self.message)
            }
            QuestionErrorKind::Protocol => "❓ Error processing server response".to_string(),
            QuestionErrorKind::Unexpected => format!("❗ Unexpected error: {}", self.message),
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionErrorKind {
    /// Connection failures, timeouts, truncated bodies
    Transport,
    /// The endpoint answered with a non-success status
    HttpStatus(u16),
    /// The reply did not carry `choices[0].message.content`
    Protocol,
    /// Anything else
    Unexpected,
}

impl QuestionErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::HttpStatus(_) => "http_status",
            Self::Protocol => "protocol",
            Self::Unexpected => "unexpected",
        }
    }
}

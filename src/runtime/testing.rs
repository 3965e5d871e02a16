//! Mock implementations for testing
//!
//! These mocks enable runtime and API tests without network or model files.

use crate::classify::{ClassifyError, Classifier, LabelEncoder};
use crate::question::{QuestionError, QuestionService};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// Mock Question Service
// ============================================================================

/// Question service returning queued replies
pub struct MockQuestionService {
    replies: Mutex<VecDeque<Result<String, QuestionError>>>,
    /// Record of all transcripts sent
    pub transcripts: Mutex<Vec<Vec<String>>>,
}

#[allow(dead_code)]
impl MockQuestionService {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            transcripts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful question
    pub fn queue_question(&self, question: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(question.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: QuestionError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_transcripts(&self) -> Vec<Vec<String>> {
        self.transcripts.lock().unwrap().clone()
    }
}

impl Default for MockQuestionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionService for MockQuestionService {
    async fn next_question(&self, transcript: &[String]) -> Result<String, QuestionError> {
        self.transcripts.lock().unwrap().push(transcript.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("Question after {} answers?", transcript.len())))
    }

    fn model_id(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Stub Classifiers and Encoder
// ============================================================================

/// Classifier that always predicts the same label
pub struct StubClassifier {
    label: usize,
    inputs: Mutex<Vec<Vec<String>>>,
}

impl StubClassifier {
    pub fn new(label: usize) -> Self {
        Self {
            label,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_inputs(&self) -> Vec<Vec<String>> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Classifier for StubClassifier {
    fn predict(&self, inputs: &[String]) -> Result<Vec<usize>, ClassifyError> {
        self.inputs.lock().unwrap().push(inputs.to_vec());
        Ok(vec![self.label; inputs.len()])
    }
}

/// Classifier whose `predict` always fails
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _inputs: &[String]) -> Result<Vec<usize>, ClassifyError> {
        Err(ClassifyError::Model("feature count mismatch".to_string()))
    }
}

/// Encoder backed by a fixed label table
pub struct StubEncoder {
    names: HashMap<usize, String>,
}

impl StubEncoder {
    pub fn new<'a>(names: impl IntoIterator<Item = (usize, &'a str)>) -> Self {
        Self {
            names: names
                .into_iter()
                .map(|(label, name)| (label, name.to_string()))
                .collect(),
        }
    }
}

impl LabelEncoder for StubEncoder {
    fn inverse_transform(&self, labels: &[usize]) -> Result<Vec<String>, ClassifyError> {
        labels
            .iter()
            .map(|label| {
                self.names
                    .get(label)
                    .cloned()
                    .ok_or(ClassifyError::UnknownLabel {
                        label: *label,
                        classes: self.names.len(),
                    })
            })
            .collect()
    }
}

//! Interview session types

use serde::{Deserialize, Serialize};

/// Smallest number of follow-up questions a session may request
pub const MIN_QUESTIONS: u32 = 1;

/// Largest number of follow-up questions a session may request
pub const MAX_QUESTIONS: u32 = 10;

/// Phase of the interview, derived from the step counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the question count and the initial symptoms
    Intake,
    /// Asking follow-up questions
    Collecting,
    /// All answers recorded, prediction shown
    Classify,
}

/// One user's interview state.
///
/// Owned by the runtime hosting the interview and passed by reference into
/// the transition function, which returns the replacement value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    transcript: Vec<String>,
    target_question_count: u32,
    current_step: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session in the intake phase
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            target_question_count: 0,
            current_step: 0,
        }
    }

    /// Session right after a successful start
    pub(super) fn started(target_question_count: u32, symptoms: String) -> Self {
        Self {
            transcript: vec![symptoms],
            target_question_count: clamp_question_count(target_question_count),
            current_step: 1,
        }
    }

    /// Copy of this session with one more answer recorded
    pub(super) fn with_answer(&self, answer: String) -> Self {
        let mut transcript = self.transcript.clone();
        transcript.push(answer);
        Self {
            transcript,
            target_question_count: self.target_question_count,
            current_step: self.current_step + 1,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.current_step == 0 {
            Phase::Intake
        } else if self.current_step <= self.target_question_count {
            Phase::Collecting
        } else {
            Phase::Classify
        }
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn target_question_count(&self) -> u32 {
        self.target_question_count
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Transcript joined the way the classifiers were trained on it
    pub fn classifier_input(&self) -> String {
        self.transcript.join(" ")
    }
}

/// Clamp a requested question count into the supported range
pub fn clamp_question_count(requested: u32) -> u32 {
    requested.clamp(MIN_QUESTIONS, MAX_QUESTIONS)
}

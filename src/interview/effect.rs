//! Effects produced by state transitions

/// Effects to be executed by the runtime after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the question service for the next question
    RequestQuestion { transcript: Vec<String> },

    /// Run one randomly chosen classifier on the joined transcript
    Classify { input: String },

    /// Show the intake screen
    ShowIntake,
}

impl Effect {
    pub fn request_question(transcript: &[String]) -> Self {
        Effect::RequestQuestion {
            transcript: transcript.to_vec(),
        }
    }
}

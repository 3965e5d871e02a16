//! Events that can occur during an interview

/// User actions that drive the interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// "Start Diagnosis" with the requested question count and symptoms
    Start {
        question_count: u32,
        symptoms: String,
    },
    /// "Next" with the answer to the current question
    Answer { text: String },
    /// "Restart" from the result screen
    Restart,
    /// The presentation layer is drawing the current screen again
    Render,
}

impl Event {
    pub fn start(question_count: u32, symptoms: impl Into<String>) -> Self {
        Event::Start {
            question_count,
            symptoms: symptoms.into(),
        }
    }

    pub fn answer(text: impl Into<String>) -> Self {
        Event::Answer { text: text.into() }
    }
}

//! Pure state transition function
//!
//! Given the same session and event, `transition` always produces the same
//! result and performs no I/O. Question requests and classification are
//! described as effects for the runtime to execute.

use super::{Effect, Event, Phase, Session};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Required text was empty or whitespace; the screen stays as it is
    #[error("Input is empty")]
    EmptyInput,
    #[error("Interview already started (restart it first)")]
    AlreadyStarted,
    #[error("No question is waiting for an answer")]
    NotCollecting,
    #[error("Restart is only available once the result is shown")]
    NotFinished,
}

impl TransitionError {
    /// Whether the presentation layer should stay silent about this error
    pub fn is_silent(self) -> bool {
        matches!(self, TransitionError::EmptyInput)
    }
}

/// Pure transition function
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    match (session.phase(), event) {
        // Intake + Start -> Collecting
        (
            Phase::Intake,
            Event::Start {
                question_count,
                symptoms,
            },
        ) => {
            if is_blank(&symptoms) {
                return Err(TransitionError::EmptyInput);
            }
            let next = Session::started(question_count, symptoms);
            let effect = Effect::request_question(next.transcript());
            Ok(TransitionResult::new(next).with_effect(effect))
        }

        (Phase::Collecting | Phase::Classify, Event::Start { .. }) => {
            Err(TransitionError::AlreadyStarted)
        }

        // Collecting + Answer -> Collecting (next question) or Classify
        (Phase::Collecting, Event::Answer { text }) => {
            if is_blank(&text) {
                return Err(TransitionError::EmptyInput);
            }
            let next = session.with_answer(text);
            let effect = match next.phase() {
                Phase::Classify => Effect::Classify {
                    input: next.classifier_input(),
                },
                _ => Effect::request_question(next.transcript()),
            };
            Ok(TransitionResult::new(next).with_effect(effect))
        }

        (Phase::Intake | Phase::Classify, Event::Answer { .. }) => {
            Err(TransitionError::NotCollecting)
        }

        // Classify + Restart -> Intake with every field reset
        (Phase::Classify, Event::Restart) => {
            Ok(TransitionResult::new(Session::new()).with_effect(Effect::ShowIntake))
        }

        (Phase::Intake | Phase::Collecting, Event::Restart) => Err(TransitionError::NotFinished),

        // The question is fetched again each time the collecting screen is drawn
        (Phase::Collecting, Event::Render) => Ok(TransitionResult::new(session.clone())
            .with_effect(Effect::request_question(session.transcript()))),

        (Phase::Intake | Phase::Classify, Event::Render) => {
            Ok(TransitionResult::new(session.clone()))
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

//! Interview runtime executor

use super::{Outcome, Screen, SessionSnapshot};
use crate::classify::ModelRepository;
use crate::interview::{transition, Effect, Event, Session, TransitionError};
use crate::question::QuestionService;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Hosts one interview: owns the session, runs effects, keeps the screen
pub struct InterviewRuntime<Q>
where
    Q: QuestionService,
{
    session_id: String,
    session: Session,
    questions: Q,
    models: Arc<ModelRepository>,
    rng: StdRng,
    screen: Screen,
}

impl<Q> InterviewRuntime<Q>
where
    Q: QuestionService,
{
    pub fn new(session_id: impl Into<String>, questions: Q, models: Arc<ModelRepository>) -> Self {
        Self {
            session_id: session_id.into(),
            session: Session::new(),
            questions,
            models,
            rng: StdRng::from_entropy(),
            screen: Screen::intake(),
        }
    }

    /// Use a fixed seed for model selection
    #[allow(dead_code)] // Used by tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[allow(dead_code)] // Used by tests
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            phase: self.session.phase(),
            step: self.session.current_step(),
            total: self.session.target_question_count(),
            screen: self.screen.clone(),
        }
    }

    /// Apply one user action and return the screen to draw.
    ///
    /// Empty input keeps the current screen without an error; other
    /// rejected actions are returned so the caller can report them.
    pub async fn handle(&mut self, event: Event) -> Result<Screen, TransitionError> {
        let result = match transition(&self.session, event) {
            Ok(r) => r,
            Err(e) if e.is_silent() => {
                tracing::debug!(session_id = %self.session_id, "Ignoring empty input");
                return Ok(self.screen.clone());
            }
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Rejected action");
                return Err(e);
            }
        };

        self.session = result.new_session;

        for effect in result.effects {
            self.execute_effect(effect).await;
        }

        Ok(self.screen.clone())
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RequestQuestion { transcript } => {
                let text = match self.questions.next_question(&transcript).await {
                    Ok(question) => question,
                    Err(e) => {
                        tracing::warn!(
                            session_id = %self.session_id,
                            step = self.session.current_step(),
                            kind = e.kind.as_str(),
                            "Showing question service error in place of question"
                        );
                        e.display_message()
                    }
                };
                self.screen = Screen::Question {
                    number: self.session.current_step(),
                    total: self.session.target_question_count(),
                    text,
                };
            }

            Effect::Classify { input } => {
                let outcome = match self.models.classify(&input, &mut self.rng) {
                    Ok(prediction) => {
                        tracing::info!(
                            session_id = %self.session_id,
                            model = %prediction.model_key,
                            disease = %prediction.disease,
                            "Prediction complete"
                        );
                        Outcome::prediction(prediction)
                    }
                    Err(e) => {
                        tracing::error!(session_id = %self.session_id, error = %e, "Prediction failed");
                        Outcome::Error {
                            message: format!("An error occurred during prediction: {e}"),
                        }
                    }
                };
                self.screen = Screen::Result { outcome };
            }

            Effect::ShowIntake => {
                tracing::info!(session_id = %self.session_id, "Interview restarted");
                self.screen = Screen::intake();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ModelPair, ModelRepository};
    use crate::interview::Phase;
    use crate::question::QuestionError;
    use crate::runtime::testing::{
        FailingClassifier, MockQuestionService, StubClassifier, StubEncoder,
    };

    fn stub_repository(label: usize) -> Arc<ModelRepository> {
        let encoder = StubEncoder::new([(3, "Migraine"), (label, "Vertigo")]);
        Arc::new(
            ModelRepository::from_pairs(vec![ModelPair::new(
                "stub",
                "stub",
                Arc::new(StubClassifier::new(label)),
                Arc::new(encoder),
            )])
            .unwrap(),
        )
    }

    fn runtime(
        questions: Arc<MockQuestionService>,
        models: Arc<ModelRepository>,
    ) -> InterviewRuntime<Arc<MockQuestionService>> {
        InterviewRuntime::new("test-session", questions, models).with_seed(1)
    }

    #[tokio::test]
    async fn test_full_interview_renders_stub_prediction() {
        let questions = Arc::new(MockQuestionService::new());
        questions.queue_question("Do you have a fever?");
        questions.queue_question("When did it start?");
        let mut rt = runtime(questions.clone(), stub_repository(11));

        let screen = rt.handle(Event::start(2, "headache, dizziness")).await.unwrap();
        assert_eq!(
            screen,
            Screen::Question {
                number: 1,
                total: 2,
                text: "Do you have a fever?".to_string()
            }
        );

        rt.handle(Event::answer("no fever")).await.unwrap();
        let screen = rt.handle(Event::answer("started yesterday")).await.unwrap();

        match screen {
            Screen::Result {
                outcome: Outcome::Prediction { disease, model_key, .. },
            } => {
                assert_eq!(disease, "Vertigo");
                assert_eq!(model_key, "stub");
            }
            other => panic!("expected prediction, got {other:?}"),
        }

        let recorded = questions.recorded_transcripts();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1], ["headache, dizziness", "no fever"]);
    }

    #[tokio::test]
    async fn test_classifier_receives_joined_transcript() {
        let classifier = Arc::new(StubClassifier::new(3));
        let models = Arc::new(
            ModelRepository::from_pairs(vec![ModelPair::new(
                "stub",
                "stub",
                classifier.clone(),
                Arc::new(StubEncoder::new([(3, "Migraine")])),
            )])
            .unwrap(),
        );
        let mut rt = runtime(Arc::new(MockQuestionService::new()), models);

        rt.handle(Event::start(2, "headache, dizziness")).await.unwrap();
        rt.handle(Event::answer("no fever")).await.unwrap();
        rt.handle(Event::answer("started yesterday")).await.unwrap();

        assert_eq!(
            classifier.recorded_inputs(),
            vec![vec!["headache, dizziness no fever started yesterday".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_displayed_and_step_unchanged() {
        let questions = Arc::new(MockQuestionService::new());
        questions.queue_error(QuestionError::transport("connection refused"));
        let mut rt = runtime(questions, stub_repository(0));

        let screen = rt.handle(Event::start(3, "rash")).await.unwrap();
        match screen {
            Screen::Question { number, text, .. } => {
                assert_eq!(number, 1);
                assert!(text.contains("Connection error"), "got {text}");
            }
            other => panic!("expected question screen, got {other:?}"),
        }
        assert_eq!(rt.session().current_step(), 1);

        // Answering the error text still advances
        rt.handle(Event::answer("itchy")).await.unwrap();
        assert_eq!(rt.session().current_step(), 2);
    }

    #[tokio::test]
    async fn test_classifier_error_stays_in_classify() {
        let models = Arc::new(
            ModelRepository::from_pairs(vec![ModelPair::new(
                "broken",
                "stub",
                Arc::new(FailingClassifier),
                Arc::new(StubEncoder::new([(0, "Flu")])),
            )])
            .unwrap(),
        );
        let mut rt = runtime(Arc::new(MockQuestionService::new()), models);

        rt.handle(Event::start(1, "cough")).await.unwrap();
        let screen = rt.handle(Event::answer("dry")).await.unwrap();

        assert!(matches!(
            screen,
            Screen::Result {
                outcome: Outcome::Error { .. }
            }
        ));
        assert_eq!(rt.session().phase(), Phase::Classify);

        // Rendering again does not retry
        let again = rt.handle(Event::Render).await.unwrap();
        assert_eq!(again, screen);
        assert_eq!(rt.session().phase(), Phase::Classify);
    }

    #[tokio::test]
    async fn test_empty_answer_keeps_screen_silently() {
        let questions = Arc::new(MockQuestionService::new());
        questions.queue_question("Any nausea?");
        let mut rt = runtime(questions.clone(), stub_repository(0));

        let before = rt.handle(Event::start(2, "stomach ache")).await.unwrap();
        let after = rt.handle(Event::answer("   ")).await.unwrap();

        assert_eq!(before, after);
        assert_eq!(rt.session().current_step(), 1);
        assert_eq!(questions.recorded_transcripts().len(), 1);
    }

    #[tokio::test]
    async fn test_render_reissues_question() {
        let questions = Arc::new(MockQuestionService::new());
        questions.queue_question("First?");
        questions.queue_question("Reworded?");
        let mut rt = runtime(questions.clone(), stub_repository(0));

        rt.handle(Event::start(2, "fatigue")).await.unwrap();
        let screen = rt.handle(Event::Render).await.unwrap();

        assert!(matches!(screen, Screen::Question { ref text, .. } if text == "Reworded?"));
        assert_eq!(questions.recorded_transcripts().len(), 2);
        assert_eq!(rt.session().current_step(), 1);
    }

    #[tokio::test]
    async fn test_restart_resets_session_and_screen() {
        let mut rt = runtime(Arc::new(MockQuestionService::new()), stub_repository(0));
        rt.handle(Event::start(1, "fever")).await.unwrap();
        rt.handle(Event::answer("high")).await.unwrap();

        let screen = rt.handle(Event::Restart).await.unwrap();
        assert_eq!(screen, Screen::intake());
        assert_eq!(rt.session(), &Session::new());
    }

    #[tokio::test]
    async fn test_out_of_phase_action_is_reported() {
        let mut rt = runtime(Arc::new(MockQuestionService::new()), stub_repository(0));
        let err = rt.handle(Event::Restart).await.unwrap_err();
        assert_eq!(err, TransitionError::NotFinished);
        assert_eq!(rt.screen(), &Screen::intake());
    }
}

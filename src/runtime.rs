//! Runtime hosting interviews
//!
//! Each user gets an `InterviewRuntime` that owns the session value; the
//! `SessionManager` maps session ids to runtimes for the HTTP front-end.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::InterviewRuntime;

use crate::classify::{ModelRepository, Prediction};
use crate::interview::{Phase, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::question::QuestionService;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Shown under every prediction
pub const ADVICE: &str =
    "Temporary advice: Please rest and drink plenty of fluids until you visit a doctor.";

/// What the presentation layer draws for the current phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Screen {
    /// Ask for the question count and the initial symptoms
    Intake {
        min_questions: u32,
        max_questions: u32,
    },
    /// A follow-up question, or the service error shown in its place
    Question { number: u32, total: u32, text: String },
    /// Final prediction; restart is the only action
    Result { outcome: Outcome },
}

impl Screen {
    pub fn intake() -> Self {
        Screen::Intake {
            min_questions: MIN_QUESTIONS,
            max_questions: MAX_QUESTIONS,
        }
    }
}

/// Result of classification as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Prediction {
        disease: String,
        model_key: String,
        advice: String,
    },
    Error {
        message: String,
    },
}

impl Outcome {
    pub fn prediction(prediction: Prediction) -> Self {
        Outcome::Prediction {
            disease: prediction.disease,
            model_key: prediction.model_key,
            advice: ADVICE.to_string(),
        }
    }
}

/// Serializable view of a runtime
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub phase: Phase,
    pub step: u32,
    pub total: u32,
    pub screen: Screen,
}

/// Runtime type used by the server
pub type SharedRuntime = Arc<Mutex<InterviewRuntime<Arc<dyn QuestionService>>>>;

/// Sessions untouched for this long are dropped
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(3600);

struct RuntimeEntry {
    runtime: SharedRuntime,
    last_active: Instant,
}

/// Manager for all interview runtimes
pub struct SessionManager {
    questions: Arc<dyn QuestionService>,
    models: Arc<ModelRepository>,
    idle_timeout: Duration,
    runtimes: RwLock<HashMap<String, RuntimeEntry>>,
}

impl SessionManager {
    pub fn new(questions: Arc<dyn QuestionService>, models: Arc<ModelRepository>) -> Self {
        Self {
            questions,
            models,
            idle_timeout: DEFAULT_SESSION_IDLE,
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    /// Evict sessions after `idle_timeout` without activity
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn models(&self) -> &ModelRepository {
        &self.models
    }

    /// Start a new session in the intake phase
    pub async fn create(&self) -> SessionSnapshot {
        let id = uuid::Uuid::new_v4().to_string();
        let runtime = InterviewRuntime::new(&id, self.questions.clone(), self.models.clone());
        let snapshot = runtime.snapshot();

        let mut runtimes = self.runtimes.write().await;
        self.evict_idle(&mut runtimes);
        runtimes.insert(
            id.clone(),
            RuntimeEntry {
                runtime: Arc::new(Mutex::new(runtime)),
                last_active: Instant::now(),
            },
        );

        tracing::info!(session_id = %id, active = runtimes.len(), "Session created");
        snapshot
    }

    /// Look up a session and mark it active
    pub async fn get(&self, session_id: &str) -> Option<SharedRuntime> {
        let mut runtimes = self.runtimes.write().await;
        self.evict_idle(&mut runtimes);
        let entry = runtimes.get_mut(session_id)?;
        entry.last_active = Instant::now();
        Some(entry.runtime.clone())
    }

    pub async fn remove(&self, session_id: &str) -> bool {
        let removed = self.runtimes.write().await.remove(session_id).is_some();
        if removed {
            tracing::info!(session_id = %session_id, "Session removed");
        }
        removed
    }

    #[allow(dead_code)] // Used by tests
    pub async fn len(&self) -> usize {
        self.runtimes.read().await.len()
    }

    fn evict_idle(&self, runtimes: &mut HashMap<String, RuntimeEntry>) {
        let idle_timeout = self.idle_timeout;
        runtimes.retain(|id, entry| {
            let keep = entry.last_active.elapsed() < idle_timeout;
            if !keep {
                tracing::info!(session_id = %id, "Session evicted after idle timeout");
            }
            keep
        });
    }
}

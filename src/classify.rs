//! Disease classification from the interview transcript
//!
//! Pre-trained text classifiers and their label encoders, exported to JSON
//! and loaded once at startup.

mod artifact;
mod error;
mod repository;
mod vectorizer;

pub use error::{ClassifyError, RepositoryError};
pub use repository::{ModelPair, ModelRepository};

use serde::Serialize;

/// Default location of the repository manifest
pub const DEFAULT_MANIFEST: &str = "models/repository.toml";

/// Text classifier producing numeric labels
pub trait Classifier: Send + Sync {
    /// One numeric label per input document
    fn predict(&self, inputs: &[String]) -> Result<Vec<usize>, ClassifyError>;
}

/// Maps numeric labels back to disease names
pub trait LabelEncoder: Send + Sync {
    fn inverse_transform(&self, labels: &[usize]) -> Result<Vec<String>, ClassifyError>;
}

/// Decoded prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub disease: String,
    /// Key of the model pair that produced it
    pub model_key: String,
}

//! Classification and repository errors

use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning a transcript into a disease label
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("No classifier is available")]
    NoModels,
    #[error("Classifier returned no prediction")]
    EmptyPrediction,
    #[error("Label {label} is not known to the encoder ({classes} classes)")]
    UnknownLabel { label: usize, classes: usize },
    /// The fitted model cannot map its output to a class
    #[error("Model error: {0}")]
    Model(String),
}

/// Failure while loading the model repository at startup
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Artifact {path} is inconsistent: {reason}")]
    Inconsistent { path: PathBuf, reason: String },
    #[error("Model {model} refers to unknown encoder {encoder}")]
    UnknownEncoder { model: String, encoder: String },
    #[error("Duplicate model key {0}")]
    DuplicateModel(String),
    #[error("Repository has no models")]
    Empty,
}

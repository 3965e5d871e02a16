//! Model repository: fixed set of classifier/encoder pairs
//!
//! Loaded once at startup from a TOML manifest and shared read-only for the
//! life of the process.

use super::artifact::{EncoderArtifact, ModelArtifact};
use super::{ClassifyError, Classifier, LabelEncoder, Prediction, RepositoryError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One classifier together with the encoder that decodes its output
#[derive(Clone)]
pub struct ModelPair {
    pub key: String,
    pub encoder_key: String,
    pub classifier: Arc<dyn Classifier>,
    pub encoder: Arc<dyn LabelEncoder>,
}

impl ModelPair {
    pub fn new(
        key: impl Into<String>,
        encoder_key: impl Into<String>,
        classifier: Arc<dyn Classifier>,
        encoder: Arc<dyn LabelEncoder>,
    ) -> Self {
        Self {
            key: key.into(),
            encoder_key: encoder_key.into(),
            classifier,
            encoder,
        }
    }

    /// Predict and decode a single document
    pub fn classify(&self, input: &str) -> Result<Prediction, ClassifyError> {
        let labels = self.classifier.predict(&[input.to_string()])?;
        let label = labels.first().copied().ok_or(ClassifyError::EmptyPrediction)?;
        let disease = self
            .encoder
            .inverse_transform(&[label])?
            .into_iter()
            .next()
            .ok_or(ClassifyError::EmptyPrediction)?;
        Ok(Prediction {
            disease,
            model_key: self.key.clone(),
        })
    }
}

impl std::fmt::Debug for ModelPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPair")
            .field("key", &self.key)
            .field("encoder_key", &self.encoder_key)
            .finish_non_exhaustive()
    }
}

/// Repository of interchangeable model pairs
#[derive(Debug)]
pub struct ModelRepository {
    pairs: Vec<ModelPair>,
}

impl ModelRepository {
    pub fn from_pairs(pairs: Vec<ModelPair>) -> Result<Self, RepositoryError> {
        if pairs.is_empty() {
            return Err(RepositoryError::Empty);
        }
        let mut seen = HashSet::new();
        if let Some(pair) = pairs.iter().find(|p| !seen.insert(p.key.clone())) {
            return Err(RepositoryError::DuplicateModel(pair.key.clone()));
        }
        Ok(Self { pairs })
    }

    /// Load every artifact named in the manifest
    pub fn load(manifest_path: &Path) -> Result<Self, RepositoryError> {
        let text = read(manifest_path)?;
        let manifest: Manifest =
            toml::from_str(&text).map_err(|source| RepositoryError::Manifest {
                path: manifest_path.to_path_buf(),
                source,
            })?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        let mut encoders: BTreeMap<String, Arc<dyn LabelEncoder>> = BTreeMap::new();
        for (key, path) in &manifest.encoders {
            let path = base.join(path);
            let encoder: EncoderArtifact = read_json(&path)?;
            if encoder.classes.is_empty() {
                return Err(RepositoryError::Inconsistent {
                    path,
                    reason: "encoder has no classes".to_string(),
                });
            }
            tracing::debug!(encoder = %key, classes = encoder.classes.len(), "Loaded encoder");
            encoders.insert(key.clone(), Arc::new(encoder));
        }

        let mut pairs = Vec::with_capacity(manifest.models.len());
        for entry in manifest.models {
            let path = base.join(&entry.path);
            let model: ModelArtifact = read_json(&path)?;
            model
                .validate()
                .map_err(|reason| RepositoryError::Inconsistent {
                    path: path.clone(),
                    reason,
                })?;

            let encoder_key = match entry.encoder {
                Some(key) => key,
                None => {
                    let key = legacy_encoder_key(&entry.key).to_string();
                    tracing::warn!(
                        model = %entry.key,
                        encoder = %key,
                        "Model has no explicit encoder; pairing by key prefix"
                    );
                    key
                }
            };
            let encoder = encoders.get(&encoder_key).cloned().ok_or_else(|| {
                RepositoryError::UnknownEncoder {
                    model: entry.key.clone(),
                    encoder: encoder_key.clone(),
                }
            })?;

            tracing::info!(model = %entry.key, encoder = %encoder_key, path = %path.display(), "Loaded model");
            pairs.push(ModelPair::new(entry.key, encoder_key, Arc::new(model), encoder));
        }

        Self::from_pairs(pairs)
    }

    /// Pick one pair uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&ModelPair, ClassifyError> {
        self.pairs.choose(rng).ok_or(ClassifyError::NoModels)
    }

    /// Classify with a randomly chosen pair
    pub fn classify<R: Rng + ?Sized>(
        &self,
        input: &str,
        rng: &mut R,
    ) -> Result<Prediction, ClassifyError> {
        self.choose(rng)?.classify(input)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn pairs(&self) -> &[ModelPair] {
        &self.pairs
    }
}

/// Encoder chosen for a model key that does not name one: `1*` -> `1`,
/// `2*` -> `2`, anything else -> `3`. Models sharing an encoder this way
/// must share a label space or predictions are decoded wrongly.
pub fn legacy_encoder_key(model_key: &str) -> &'static str {
    if model_key.starts_with('1') {
        "1"
    } else if model_key.starts_with('2') {
        "2"
    } else {
        "3"
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    encoders: BTreeMap<String, PathBuf>,
    #[serde(default)]
    models: Vec<ManifestModel>,
}

#[derive(Debug, Deserialize)]
struct ManifestModel {
    key: String,
    path: PathBuf,
    #[serde(default)]
    encoder: Option<String>,
}

fn read(path: &Path) -> Result<String, RepositoryError> {
    std::fs::read_to_string(path).map_err(|source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RepositoryError> {
    let text = read(path)?;
    serde_json::from_str(&text).map_err(|source| RepositoryError::Artifact {
        path: path.to_path_buf(),
        source,
    })
}

//! Bag-of-words text vectorizer
//!
//! Mirrors the fitted state of a scikit-learn `CountVectorizer` /
//! `TfidfVectorizer` with the default token pattern, exported as JSON.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Runs of two or more word characters
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    /// Leave term weights unnormalized
    #[serde(rename = "none")]
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextVectorizer {
    /// Token to feature column
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequencies; absent for plain count vectors
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn default_lowercase() -> bool {
    true
}

impl TextVectorizer {
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Check the fitted state is self-consistent
    pub fn validate(&self) -> Result<(), String> {
        let n = self.n_features();
        if n == 0 {
            return Err("vocabulary is empty".to_string());
        }
        if let Some((token, column)) = self.vocabulary.iter().find(|(_, c)| **c >= n) {
            return Err(format!("token {token:?} maps to column {column} of {n}"));
        }
        if let Some(idf) = &self.idf {
            if idf.len() != n {
                return Err(format!("idf has {} weights for {n} features", idf.len()));
            }
        }
        Ok(())
    }

    /// Dense feature vector for one document
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0_f64; self.n_features()];

        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        for token in TOKEN.find_iter(&text) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                features[column] += 1.0;
            }
        }

        if self.sublinear_tf {
            for value in &mut features {
                if *value > 0.0 {
                    *value = 1.0 + value.ln();
                }
            }
        }

        if let Some(idf) = &self.idf {
            for (value, weight) in features.iter_mut().zip(idf) {
                *value *= weight;
            }
        }

        if self.norm == Norm::L2 {
            let length = features.iter().map(|v| v * v).sum::<f64>().sqrt();
            if length > 0.0 {
                for value in &mut features {
                    *value /= length;
                }
            }
        }

        features
    }
}

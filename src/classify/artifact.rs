//! Exported model and label-encoder artifacts
//!
//! A model artifact is a fitted text pipeline: a vectorizer followed by
//! either a linear classifier or a small multi-layer perceptron. An encoder
//! artifact is the ordered list of label strings.

use super::vectorizer::TextVectorizer;
use super::{ClassifyError, Classifier, LabelEncoder};
use serde::Deserialize;

/// Fitted classification pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Mlp(MlpModel),
}

impl ModelArtifact {
    fn vectorizer(&self) -> &TextVectorizer {
        match self {
            ModelArtifact::Linear(m) => &m.vectorizer,
            ModelArtifact::Mlp(m) => &m.vectorizer,
        }
    }

    /// Check dimensions line up from vectorizer to output classes
    pub fn validate(&self) -> Result<(), String> {
        self.vectorizer().validate()?;
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::Mlp(m) => m.validate(),
        }
    }

    fn predict_one(&self, text: &str) -> Result<usize, ClassifyError> {
        let features = self.vectorizer().transform(text);
        match self {
            ModelArtifact::Linear(m) => m.predict_features(&features),
            ModelArtifact::Mlp(m) => m.predict_features(&features),
        }
    }
}

impl Classifier for ModelArtifact {
    fn predict(&self, inputs: &[String]) -> Result<Vec<usize>, ClassifyError> {
        inputs.iter().map(|text| self.predict_one(text)).collect()
    }
}

/// Linear model (logistic regression, linear SVM, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub vectorizer: TextVectorizer,
    /// One row of weights per class, or a single row for binary problems
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Numeric label for each output
    pub classes: Vec<usize>,
}

impl LinearModel {
    fn validate(&self) -> Result<(), String> {
        let n = self.vectorizer.n_features();
        check_classes(&self.classes)?;
        let binary = self.coef.len() == 1 && self.classes.len() == 2;
        if !binary && self.coef.len() != self.classes.len() {
            return Err(format!(
                "{} coefficient rows for {} classes",
                self.coef.len(),
                self.classes.len()
            ));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(format!(
                "{} intercepts for {} coefficient rows",
                self.intercept.len(),
                self.coef.len()
            ));
        }
        if let Some(row) = self.coef.iter().find(|row| row.len() != n) {
            return Err(format!("coefficient row has {} weights for {n} features", row.len()));
        }
        Ok(())
    }

    fn predict_features(&self, features: &[f64]) -> Result<usize, ClassifyError> {
        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| dot(row, features) + bias)
            .collect();
        pick_class(&scores, &self.classes)
    }
}

/// Dense layer, weights laid out input-major
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.len()
    }

    fn outputs(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut output = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (out, w) in output.iter_mut().zip(row) {
                *out += x * w;
            }
        }
        output
    }
}

/// Multi-layer perceptron with `ReLU` hidden activations
#[derive(Debug, Clone, Deserialize)]
pub struct MlpModel {
    pub vectorizer: TextVectorizer,
    pub layers: Vec<DenseLayer>,
    pub classes: Vec<usize>,
}

impl MlpModel {
    fn validate(&self) -> Result<(), String> {
        let Some(last) = self.layers.last() else {
            return Err("network has no layers".to_string());
        };
        check_classes(&self.classes)?;
        let mut width = self.vectorizer.n_features();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.inputs() != width {
                return Err(format!(
                    "layer {i} expects {} inputs, previous width is {width}",
                    layer.inputs()
                ));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != layer.outputs()) {
                return Err(format!(
                    "layer {i} has a row of {} weights for {} outputs",
                    row.len(),
                    layer.outputs()
                ));
            }
            width = layer.outputs();
        }
        let binary = last.outputs() == 1 && self.classes.len() == 2;
        if !binary && last.outputs() != self.classes.len() {
            return Err(format!(
                "output layer has {} units for {} classes",
                last.outputs(),
                self.classes.len()
            ));
        }
        Ok(())
    }

    fn predict_features(&self, features: &[f64]) -> Result<usize, ClassifyError> {
        let mut activation = features.to_vec();
        let hidden = self.layers.len().saturating_sub(1);
        for (i, layer) in self.layers.iter().enumerate() {
            activation = layer.forward(&activation);
            if i < hidden {
                for value in &mut activation {
                    *value = value.max(0.0);
                }
            }
        }
        pick_class(&activation, &self.classes)
    }
}

/// Label strings indexed by numeric label
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderArtifact {
    pub classes: Vec<String>,
}

impl LabelEncoder for EncoderArtifact {
    fn inverse_transform(&self, labels: &[usize]) -> Result<Vec<String>, ClassifyError> {
        labels
            .iter()
            .map(|&label| {
                self.classes
                    .get(label)
                    .cloned()
                    .ok_or(ClassifyError::UnknownLabel {
                        label,
                        classes: self.classes.len(),
                    })
            })
            .collect()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// A classifier needs at least two labels to choose between
fn check_classes(classes: &[usize]) -> Result<(), String> {
    if classes.len() < 2 {
        return Err(format!("{} classes, at least 2 required", classes.len()));
    }
    Ok(())
}

/// Single decision score means binary: positive picks the second class
fn pick_class(scores: &[f64], classes: &[usize]) -> Result<usize, ClassifyError> {
    let index = if let [score] = scores {
        usize::from(*score > 0.0)
    } else {
        scores
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
                Some((_, top)) if s <= top => best,
                _ => Some((i, s)),
            })
            .map(|(i, _)| i)
            .ok_or_else(|| ClassifyError::Model("model produced no scores".to_string()))?
    };
    classes.get(index).copied().ok_or_else(|| {
        ClassifyError::Model(format!(
            "output {index} has no class ({} classes)",
            classes.len()
        ))
    })
}

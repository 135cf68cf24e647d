//! Statistical emotion classification.
//!
//! The model itself is a black box behind [`EmotionModel`]: it receives a padded id
//! sequence and returns one probability per label. [`EmotionClassifier`] ties the
//! tokenizer, the model and the label list together and picks the arg-max label.

use crate::brain::emotion::Emotion;
use crate::brain::tokenizer::{SequenceTokenizer, PAD_ID};
use crate::error::AppError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A loaded classifier that scores padded token sequences.
pub trait EmotionModel: Send + Sync + 'static {
    /// Returns a probability distribution over the label space.
    fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>, AppError>;

    /// Size of the label space the model was trained on.
    fn num_labels(&self) -> usize;
}

/// Ordered label list; index `i` names the model's output `i`.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<Emotion>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Result<Self, AppError> {
        if labels.is_empty() {
            return Err(AppError::ModelUnavailable("label list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(AppError::ModelUnavailable(format!(
                    "duplicate label '{}' in label list",
                    label
                )));
            }
        }
        Ok(Self {
            labels: labels.iter().map(|l| Emotion::from(l.as_str())).collect(),
        })
    }

    /// Load the label list (a JSON array of strings).
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::ModelUnavailable(format!("cannot read labels {:?}: {}", path, e))
        })?;
        let labels: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| AppError::ModelUnavailable(format!("malformed labels: {}", e)))?;
        let set = Self::new(labels)?;
        info!("Loaded {} labels from {:?}", set.len(), path);
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, index: usize) -> Option<&Emotion> {
        self.labels.get(index)
    }
}

/// Bag-of-embeddings linear classifier exported as JSON.
///
/// `logits = bias + sum(weights[id])` over non-padding ids, followed by a softmax.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearModel {
    pub fn new(weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self, AppError> {
        let model = Self { weights, bias };
        model.validate()?;
        Ok(model)
    }

    /// Load the model weights from disk.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::ModelUnavailable(format!("cannot read model {:?}: {}", path, e))
        })?;
        let LinearModel { weights, bias } = serde_json::from_str(&raw)
            .map_err(|e| AppError::ModelUnavailable(format!("malformed model: {}", e)))?;
        let model = Self::new(weights, bias)?;
        info!(
            "Loaded classifier from {:?} (vocab {}, {} labels)",
            path,
            model.weights.len(),
            model.bias.len()
        );
        Ok(model)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.bias.is_empty() {
            return Err(AppError::ModelUnavailable("model has no outputs".to_string()));
        }
        if let Some(row) = self.weights.iter().position(|r| r.len() != self.bias.len()) {
            return Err(AppError::ModelUnavailable(format!(
                "weight row {} has {} columns, expected {}",
                row,
                self.weights[row].len(),
                self.bias.len()
            )));
        }
        Ok(())
    }
}

impl EmotionModel for LinearModel {
    fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>, AppError> {
        let mut logits = self.bias.clone();
        for &id in sequence.iter().filter(|&&id| id != PAD_ID) {
            if let Some(row) = self.weights.get(id as usize) {
                for (logit, weight) in logits.iter_mut().zip(row) {
                    *logit += weight;
                }
            }
        }
        Ok(softmax(&logits))
    }

    fn num_labels(&self) -> usize {
        self.bias.len()
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}

/// Index of the largest probability; the first maximal index wins and NaN never wins.
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probabilities.iter().enumerate() {
        if p.is_nan() {
            continue;
        }
        match best {
            Some((_, best_p)) if p <= best_p => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(i, _)| i)
}

/// Raw text label prediction: normalized text in, label out.
#[derive(Clone)]
pub struct EmotionClassifier {
    tokenizer: SequenceTokenizer,
    model: Arc<dyn EmotionModel>,
    labels: LabelSet,
}

impl EmotionClassifier {
    pub fn new(
        tokenizer: SequenceTokenizer,
        model: Arc<dyn EmotionModel>,
        labels: LabelSet,
    ) -> Result<Self, AppError> {
        if model.num_labels() != labels.len() {
            return Err(AppError::ModelUnavailable(format!(
                "model predicts {} labels but label list has {}",
                model.num_labels(),
                labels.len()
            )));
        }
        Ok(Self {
            tokenizer,
            model,
            labels,
        })
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Words the tokenizer can map to an id.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.tokenizer.words()
    }

    /// Predict the label of an already normalized utterance.
    pub fn classify(&self, normalized: &str) -> Result<Emotion, AppError> {
        let sequence = self.tokenizer.encode(normalized);
        let probabilities = self.model.predict(&sequence)?;
        if probabilities.len() != self.labels.len() {
            return Err(AppError::ModelUnavailable(format!(
                "classifier returned {} probabilities for {} labels",
                probabilities.len(),
                self.labels.len()
            )));
        }

        let index = argmax(&probabilities).ok_or_else(|| {
            AppError::ModelUnavailable("classifier returned no usable probabilities".to_string())
        })?;
        let emotion = self
            .labels
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("label index {} out of range", index)))?;

        debug!(
            "Classifier picked '{}' (p={:.3})",
            emotion, probabilities[index]
        );
        Ok(emotion)
    }
}

//! Emotion Pipeline - Main orchestrator for the Brain module.
//!
//! Normalizes the utterance, asks the statistical classifier for a label, lets the
//! keyword rules override it and picks a reply.
//!
//! All collaborators are immutable after construction, so one pipeline can be
//! shared across any number of concurrent requests.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use super::classifier::EmotionClassifier;
use super::emotion::Emotion;
use super::normalizer::TextNormalizer;
use super::responses::ResponseTable;
use super::rules::RuleOverrideEngine;
use crate::error::AppError;

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Trimmed user input
    pub input: String,
    /// Final emotion after rule overrides
    pub emotion: Emotion,
    /// Supportive reply for `emotion`
    pub reply: String,
}

pub struct EmotionPipeline {
    normalizer: TextNormalizer,
    classifier: EmotionClassifier,
    rules: RuleOverrideEngine,
    responses: ResponseTable,
}

impl EmotionPipeline {
    /// The normalizer lemmatizes against the classifier's vocabulary.
    pub fn new(classifier: EmotionClassifier, responses: ResponseTable) -> Self {
        Self {
            normalizer: TextNormalizer::with_lexicon(classifier.vocabulary()),
            classifier,
            rules: RuleOverrideEngine::new(),
            responses,
        }
    }

    /// Classify `raw_text` and choose a reply.
    ///
    /// Fails with [`AppError::EmptyInput`] when the text is blank; classifier
    /// failures are propagated as-is.
    #[instrument(skip_all, fields(chars = raw_text.chars().count()))]
    pub fn process(&self, raw_text: &str) -> Result<PipelineResult, AppError> {
        let input = raw_text.trim();
        if input.is_empty() {
            return Err(AppError::EmptyInput);
        }
        let start = Instant::now();

        let normalized = self.normalizer.normalize(raw_text);
        let predicted = self.classifier.classify(&normalized)?;

        let emotion = self.rules.override_label(raw_text, predicted);

        let reply = self.responses.select_reply(&emotion).to_string();

        debug!(
            "Pipeline done in {}µs: normalized={:?} emotion={}",
            start.elapsed().as_micros(),
            normalized,
            emotion
        );

        Ok(PipelineResult {
            input: input.to_string(),
            emotion,
            reply,
        })
    }
}

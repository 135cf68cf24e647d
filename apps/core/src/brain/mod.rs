//! # Brain Module
//!
//! Emotion inference for MoodChat.
//! Turns a user utterance into an emotion label and a supportive reply.
//!
//! ## Components
//! - `normalizer`: Text cleaning (URLs, non-letters, stopwords, lemmas)
//! - `tokenizer`: Word-index encoding with fixed-length padding
//! - `classifier`: Statistical classifier adapter (model is a black box)
//! - `rules`: Keyword overrides with fixed precedence
//! - `responses`: Reply table
//! - `pipeline`: Main orchestrator

pub mod classifier;
pub mod emotion;
pub mod normalizer;
pub mod pipeline;
pub mod responses;
pub mod rules;
pub mod tokenizer;

#[allow(unused_imports)]
pub use classifier::{EmotionClassifier, EmotionModel, LabelSet, LinearModel};
#[allow(unused_imports)]
pub use emotion::Emotion;
#[allow(unused_imports)]
pub use normalizer::TextNormalizer;
pub use pipeline::{EmotionPipeline, PipelineResult};
#[allow(unused_imports)]
pub use responses::{ResponseTable, DEFAULT_REPLY};
#[allow(unused_imports)]
pub use rules::{RuleMatch, RuleOverrideEngine};
pub use tokenizer::SequenceTokenizer;

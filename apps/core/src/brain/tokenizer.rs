//! Word-index tokenizer with fixed-length padding.
//!
//! Reads the JSON written by a Keras `Tokenizer.to_json()` export, where
//! `config.word_index` is itself a JSON-encoded string, as well as a plain
//! `{"word_index": {...}}` object.

use crate::error::AppError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Id used for end padding
pub const PAD_ID: u32 = 0;

#[derive(Debug, Deserialize)]
struct TokenizerConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenizerFile {
    Keras { config: TokenizerConfig },
    Plain(TokenizerConfig),
}

/// Maps normalized text to a fixed-length id sequence.
#[derive(Debug, Clone)]
pub struct SequenceTokenizer {
    word_index: HashMap<String, u32>,
    num_words: Option<usize>,
    oov_id: Option<u32>,
    max_len: usize,
}

impl SequenceTokenizer {
    /// Build a tokenizer from an in-memory vocabulary.
    pub fn new(
        word_index: HashMap<String, u32>,
        num_words: Option<usize>,
        oov_token: Option<&str>,
        max_len: usize,
    ) -> Self {
        let oov_id = oov_token.and_then(|token| word_index.get(token).copied());
        Self {
            word_index,
            num_words,
            oov_id,
            max_len,
        }
    }

    /// Load a tokenizer artifact from disk.
    pub fn load(path: &Path, max_len: usize) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::ModelUnavailable(format!("cannot read tokenizer {:?}: {}", path, e))
        })?;
        let tokenizer = Self::from_json(&raw, max_len)?;
        info!(
            "Loaded tokenizer from {:?} ({} words, max_len {})",
            path,
            tokenizer.vocab_size(),
            max_len
        );
        Ok(tokenizer)
    }

    /// Parse a tokenizer artifact.
    pub fn from_json(raw: &str, max_len: usize) -> Result<Self, AppError> {
        let file: TokenizerFile = serde_json::from_str(raw)
            .map_err(|e| AppError::ModelUnavailable(format!("malformed tokenizer: {}", e)))?;
        let config = match file {
            TokenizerFile::Keras { config } => config,
            TokenizerFile::Plain(config) => config,
        };

        let word_index: HashMap<String, u32> = match config.word_index {
            Value::String(encoded) => serde_json::from_str(&encoded),
            other => serde_json::from_value(other),
        }
        .map_err(|e| AppError::ModelUnavailable(format!("malformed word_index: {}", e)))?;

        if word_index.is_empty() {
            return Err(AppError::ModelUnavailable(
                "tokenizer word_index is empty".to_string(),
            ));
        }

        Ok(Self::new(
            word_index,
            config.num_words,
            config.oov_token.as_deref(),
            max_len,
        ))
    }

    pub fn vocab_size(&self) -> usize {
        self.word_index.len()
    }

    /// Every word in the vocabulary, in no particular order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.word_index.keys().map(String::as_str)
    }

    fn lookup(&self, word: &str) -> Option<u32> {
        let id = self.word_index.get(word).copied();
        match (id, self.num_words) {
            (Some(id), Some(limit)) if id as usize >= limit => self.oov_id,
            (Some(id), _) => Some(id),
            (None, _) => self.oov_id,
        }
    }

    /// Encode `text` into exactly `max_len` ids, truncating or padding at the end.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        let mut sequence: Vec<u32> = text
            .split_whitespace()
            .filter_map(|word| self.lookup(word))
            .take(self.max_len)
            .collect();
        sequence.resize(self.max_len, PAD_ID);
        sequence
    }
}

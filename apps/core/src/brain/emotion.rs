//! Emotion labels.
//!
//! The classifier's label space comes from a loaded label list, so it is open-ended.
//! Labels the application knows about get their own variant; anything else the
//! classifier emits is carried verbatim in `Other`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single emotion label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Emotion {
    Joy,
    Sadness,
    Anxiety,
    Anger,
    Fear,
    Calm,
    /// A classifier label with no dedicated variant (e.g. `surprise`).
    Other(String),
}

impl Emotion {
    /// Returns the wire label for the emotion
    pub fn label(&self) -> &str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anxiety => "anxiety",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Calm => "calm",
            Emotion::Other(label) => label,
        }
    }
}

impl From<&str> for Emotion {
    fn from(label: &str) -> Self {
        match label {
            "joy" => Emotion::Joy,
            "sadness" => Emotion::Sadness,
            "anxiety" => Emotion::Anxiety,
            "anger" => Emotion::Anger,
            "fear" => Emotion::Fear,
            "calm" => Emotion::Calm,
            other => Emotion::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Emotion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Emotion::from(label.as_str()))
    }
}

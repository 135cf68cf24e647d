//! Canned supportive replies per emotion.

use crate::brain::emotion::Emotion;
use crate::error::AppError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Reply used for labels missing from the table.
pub const DEFAULT_REPLY: &str = "I'm here with you. Want to say more?";

/// (emotion label, candidate replies)
const BUILTIN_RESPONSES: &[(&str, &[&str])] = &[
    (
        "joy",
        &[
            "That’s wonderful to hear 😊 Tell me what made you feel happy today!",
            "I’m glad you’re feeling positive. Want to share more?",
        ],
    ),
    (
        "sadness",
        &[
            "I’m really sorry you’re feeling this way. Do you want to talk about what happened?",
            "That sounds heavy. I’m here with you — what’s on your mind?",
        ],
    ),
    (
        "anger",
        &[
            "That sounds frustrating. Want to tell me what triggered it?",
            "I can understand that anger. Let’s unpack it together.",
        ],
    ),
    (
        "anxiety",
        &[
            "That sounds stressful. Let’s take it one step at a time — what’s worrying you most?",
            "I’m here. Try a slow breath: in 4 seconds, hold 2, out 6. What’s the main fear?",
        ],
    ),
    (
        "fear",
        &[
            "That sounds scary. You’re not alone — what part feels most threatening?",
            "I hear you. Let’s identify what you can control right now.",
        ],
    ),
    (
        "calm",
        &[
            "I’m happy you’re feeling calm. Want to reflect on what helped?",
            "That’s good — maintaining calm is powerful. What’s going well?",
        ],
    ),
];

/// Emotion to reply mapping with a default fallback.
#[derive(Debug, Clone)]
pub struct ResponseTable {
    entries: Vec<(Emotion, Vec<String>)>,
    default_reply: String,
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ResponseTable {
    /// The built-in reply table.
    pub fn builtin() -> Self {
        let entries = BUILTIN_RESPONSES
            .iter()
            .map(|(label, replies)| {
                (
                    Emotion::from(*label),
                    replies.iter().map(|r| r.to_string()).collect(),
                )
            })
            .collect();
        Self {
            entries,
            default_reply: DEFAULT_REPLY.to_string(),
        }
    }

    /// Build a table from label -> replies, rejecting empty candidate lists.
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Result<Self, AppError> {
        let mut entries = Vec::with_capacity(map.len());
        for (label, replies) in map {
            if replies.is_empty() {
                return Err(AppError::Config(format!(
                    "responses for '{}' must not be empty",
                    label
                )));
            }
            if replies.iter().any(|r| r.trim().is_empty()) {
                return Err(AppError::Config(format!(
                    "responses for '{}' contain a blank reply",
                    label
                )));
            }
            entries.push((Emotion::from(label.as_str()), replies));
        }
        Ok(Self {
            entries,
            default_reply: DEFAULT_REPLY.to_string(),
        })
    }

    /// Load a replacement table from a JSON object `{label: [reply, ...]}`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read responses {:?}: {}", path, e))
        })?;
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("malformed responses file: {}", e)))?;
        let table = Self::from_map(map)?;
        info!("Loaded {} response groups from {:?}", table.entries.len(), path);
        Ok(table)
    }

    pub fn candidates(&self, emotion: &Emotion) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(e, _)| e == emotion)
            .map(|(_, replies)| replies.as_slice())
    }

    /// First candidate for `emotion`, or the default reply.
    pub fn select_reply(&self, emotion: &Emotion) -> &str {
        self.candidates(emotion)
            .and_then(|replies| replies.first())
            .map(String::as_str)
            .unwrap_or(self.default_reply.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_covers_known_emotions() {
        let table = ResponseTable::builtin();
        for emotion in [
            Emotion::Joy,
            Emotion::Sadness,
            Emotion::Anger,
            Emotion::Anxiety,
            Emotion::Fear,
            Emotion::Calm,
        ] {
            let candidates = table.candidates(&emotion).unwrap();
            assert_eq!(candidates.len(), 2);
            assert_eq!(table.select_reply(&emotion), candidates[0]);
        }
    }

    #[test]
    fn test_builtin_first_candidates_are_verbatim() {
        let table = ResponseTable::builtin();
        assert_eq!(
            table.select_reply(&Emotion::Anxiety),
            "That sounds stressful. Let’s take it one step at a time — what’s worrying you most?"
        );
        assert_eq!(
            table.select_reply(&Emotion::Joy),
            "That’s wonderful to hear 😊 Tell me what made you feel happy today!"
        );
        assert_eq!(
            table.candidates(&Emotion::Sadness).unwrap()[1],
            "That sounds heavy. I’m here with you — what’s on your mind?"
        );
        assert_eq!(DEFAULT_REPLY, "I'm here with you. Want to say more?");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let table = ResponseTable::builtin();
        let first = table.select_reply(&Emotion::Joy).to_string();
        for _ in 0..20 {
            assert_eq!(table.select_reply(&Emotion::Joy), first);
        }
    }

    #[test]
    fn test_unknown_label_gets_default() {
        let table = ResponseTable::builtin();
        assert_eq!(
            table.select_reply(&Emotion::Other("surprise".to_string())),
            DEFAULT_REPLY
        );
    }

    #[test]
    fn test_from_map_rejects_empty_lists() {
        let mut map = BTreeMap::new();
        map.insert("joy".to_string(), vec![]);
        assert!(matches!(ResponseTable::from_map(map), Err(AppError::Config(_))));

        let mut map = BTreeMap::new();
        map.insert("joy".to_string(), vec!["  ".to_string()]);
        assert!(matches!(ResponseTable::from_map(map), Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_replaces_builtin_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"joy": ["Yay!", "Nice."], "love": ["Aww."]}}"#).unwrap();

        let table = ResponseTable::load(file.path()).unwrap();
        assert_eq!(table.select_reply(&Emotion::Joy), "Yay!");
        assert_eq!(table.select_reply(&Emotion::Other("love".to_string())), "Aww.");
        assert_eq!(table.select_reply(&Emotion::Calm), DEFAULT_REPLY);
    }
}

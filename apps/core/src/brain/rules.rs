//! Keyword rule overrides.
//!
//! Deterministic whole-word keyword matching that can replace the statistical
//! classifier's label. Categories are checked in a fixed precedence order
//! (joy, anxiety, anger, sadness, calm) and the first category with any match wins.
//! Matching runs on the lowercased raw text, before stopword removal or
//! lemmatization.

use crate::brain::emotion::Emotion;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const JOY_TRIGGERS: &[&str] = &[
    "happy",
    "happiness",
    "excited",
    "great",
    "amazing",
    "wonderful",
    "love",
    "positive",
    "confident",
];

const SADNESS_TRIGGERS: &[&str] = &[
    "sad",
    "lonely",
    "miss",
    "cry",
    "depressed",
    "hopeless",
    "heartbroken",
    "disappointed",
];

const ANXIETY_TRIGGERS: &[&str] = &[
    "stress",
    "stressed",
    "anxious",
    "anxiety",
    "worried",
    "worry",
    "panic",
    "overthinking",
    "nervous",
];

const ANGER_TRIGGERS: &[&str] = &[
    "angry",
    "mad",
    "furious",
    "annoyed",
    "irritated",
    "hate",
    "frustrated",
];

const CALM_TRIGGERS: &[&str] = &[
    "calm",
    "relaxed",
    "peaceful",
    "fine",
    "okay",
    "ok",
    "chill",
    "at ease",
    "content",
];

/// Builds `\b(?:a|b|...)\b` with every trigger escaped.
///
/// Boundaries are Unicode-aware: combining marks count as word characters, so
/// `ok` followed by U+0301 is a different word and does not match.
fn word_boundary_pattern(triggers: &[&str]) -> Regex {
    let alternation = triggers
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("Invalid regex: keyword category")
}

// Precedence order; iteration order is significant.
static CATEGORIES: LazyLock<Vec<KeywordCategory>> = LazyLock::new(|| {
    vec![
        KeywordCategory::new(Emotion::Joy, JOY_TRIGGERS),
        KeywordCategory::new(Emotion::Anxiety, ANXIETY_TRIGGERS),
        KeywordCategory::new(Emotion::Anger, ANGER_TRIGGERS),
        KeywordCategory::new(Emotion::Sadness, SADNESS_TRIGGERS),
        KeywordCategory::new(Emotion::Calm, CALM_TRIGGERS),
    ]
});

/// An emotion and the trigger words that force it.
#[derive(Debug, Clone)]
pub struct KeywordCategory {
    emotion: Emotion,
    triggers: &'static [&'static str],
    pattern: Regex,
}

impl KeywordCategory {
    fn new(emotion: Emotion, triggers: &'static [&'static str]) -> Self {
        Self {
            emotion,
            triggers,
            pattern: word_boundary_pattern(triggers),
        }
    }

    pub fn emotion(&self) -> &Emotion {
        &self.emotion
    }

    pub fn triggers(&self) -> &'static [&'static str] {
        self.triggers
    }

    /// First trigger occurrence in already-lowercased text.
    fn find<'t>(&self, lowered: &'t str) -> Option<&'t str> {
        self.pattern.find(lowered).map(|m| m.as_str())
    }
}

/// Winning category for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub emotion: Emotion,
    pub trigger: String,
}

/// Applies the keyword categories on top of a classifier label.
pub struct RuleOverrideEngine {
    categories: &'static [KeywordCategory],
}

impl Default for RuleOverrideEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleOverrideEngine {
    pub fn new() -> Self {
        let engine = Self {
            categories: CATEGORIES.as_slice(),
        };
        debug!(
            "Keyword overrides: {}",
            engine
                .categories()
                .iter()
                .map(|c| format!("{} ({})", c.emotion(), c.triggers().len()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        engine
    }

    /// Categories in precedence order.
    pub fn categories(&self) -> &[KeywordCategory] {
        self.categories
    }

    /// Returns the highest-precedence category matching `text`, if any.
    pub fn evaluate(&self, text: &str) -> Option<RuleMatch> {
        let lowered = text.to_lowercase();
        self.categories.iter().find_map(|category| {
            category.find(&lowered).map(|trigger| RuleMatch {
                emotion: category.emotion().clone(),
                trigger: trigger.to_string(),
            })
        })
    }

    /// Replaces `predicted` with the first matching category's emotion, or returns
    /// it unchanged when no category matches.
    pub fn override_label(&self, text: &str, predicted: Emotion) -> Emotion {
        match self.evaluate(text) {
            Some(rule) => {
                if rule.emotion != predicted {
                    debug!(
                        "Rule '{}' overrides classifier: {} -> {}",
                        rule.trigger, predicted, rule.emotion
                    );
                }
                rule.emotion
            }
            None => predicted,
        }
    }
}

//! Brain Module Tests
//!
//! Cross-component checks for normalization, rule overrides, reply selection and the
//! pipeline orchestrator.

use crate::brain::{
    Emotion, EmotionClassifier, EmotionModel, EmotionPipeline, LabelSet, ResponseTable,
    RuleOverrideEngine, SequenceTokenizer, TextNormalizer, DEFAULT_REPLY,
};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;

/// Model that always puts all mass on one label index.
struct OneHotModel {
    index: usize,
    num_labels: usize,
}

impl EmotionModel for OneHotModel {
    fn predict(&self, _sequence: &[u32]) -> Result<Vec<f32>, AppError> {
        let mut probs = vec![0.0; self.num_labels];
        probs[self.index] = 1.0;
        Ok(probs)
    }

    fn num_labels(&self) -> usize {
        self.num_labels
    }
}

const LABELS: &[&str] = &["anger", "calm", "fear", "joy", "sadness", "surprise"];

fn pipeline_predicting(label: &str) -> EmotionPipeline {
    let index = LABELS.iter().position(|l| *l == label).unwrap();
    let tokenizer = SequenceTokenizer::new(
        HashMap::from([("<OOV>".to_string(), 1)]),
        None,
        Some("<OOV>"),
        40,
    );
    let labels = LabelSet::new(LABELS.iter().map(|s| s.to_string()).collect()).unwrap();
    let model = OneHotModel {
        index,
        num_labels: LABELS.len(),
    };
    let classifier = EmotionClassifier::new(tokenizer, Arc::new(model), labels).unwrap();
    EmotionPipeline::new(classifier, ResponseTable::builtin())
}

#[cfg(test)]
mod rule_override_tests {
    use super::*;

    /// One trigger per category, listed in precedence order.
    const SAMPLES: &[(&str, Emotion)] = &[
        ("wonderful", Emotion::Joy),
        ("nervous", Emotion::Anxiety),
        ("irritated", Emotion::Anger),
        ("heartbroken", Emotion::Sadness),
        ("peaceful", Emotion::Calm),
    ];

    #[test]
    fn test_precedence_for_every_pair_in_both_orders() {
        let engine = RuleOverrideEngine::new();
        for (i, (high_word, high)) in SAMPLES.iter().enumerate() {
            for (low_word, _) in &SAMPLES[i + 1..] {
                for text in [
                    format!("I feel {} and {}", high_word, low_word),
                    format!("I feel {} and {}", low_word, high_word),
                ] {
                    assert_eq!(
                        engine.override_label(&text, Emotion::Fear),
                        *high,
                        "for '{}'",
                        text
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_trigger_matches_its_category_alone() {
        let engine = RuleOverrideEngine::new();
        for category in engine.categories() {
            for trigger in category.triggers() {
                let text = format!("honestly {} today", trigger);
                let rule = engine.evaluate(&text).unwrap();
                assert_eq!(&rule.emotion, category.emotion(), "for '{}'", text);
                assert_eq!(rule.trigger, *trigger);
            }
        }
    }

    #[test]
    fn test_triggers_inside_larger_words_do_not_match() {
        let engine = RuleOverrideEngine::new();
        for text in [
            "broken",
            "token",
            "unhappy",
            "crying",
            "madam",
            "hateful",
            "calmly",
            "refined",
            "discontent",
            "missed",
        ] {
            assert_eq!(engine.evaluate(text), None, "'{}' should not match", text);
        }
    }

    #[test]
    fn test_punctuation_counts_as_boundary() {
        let engine = RuleOverrideEngine::new();
        assert_eq!(engine.override_label("ok.", Emotion::Fear), Emotion::Calm);
        assert_eq!(engine.override_label("(sad)", Emotion::Fear), Emotion::Sadness);
        assert_eq!(engine.override_label("so-happy", Emotion::Fear), Emotion::Joy);
    }

    #[test]
    fn test_fallback_keeps_any_label() {
        let engine = RuleOverrideEngine::new();
        for label in LABELS {
            let predicted = Emotion::from(*label);
            assert_eq!(engine.override_label("xyzzy plugh", predicted.clone()), predicted);
        }
    }
}

#[cfg(test)]
mod normalizer_tests {
    use super::*;

    #[test]
    fn test_rules_see_raw_text_not_normalized_text() {
        // "at" is a stopword, so the phrase only survives in the raw text
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("I am at ease"), "ease");
        assert_eq!(
            pipeline_predicting("fear").process("I am at ease").unwrap().emotion,
            Emotion::Calm
        );
    }

    #[test]
    fn test_idempotence_on_varied_input() {
        let normalizer = TextNormalizer::new();
        for text in [
            "OMG!!! I can't believe my EXAMS are tomorrow 😱",
            "Feelings, memories & worries...",
            "www.example.com says hi",
            "tabs\tand\nnewlines",
        ] {
            let once = normalizer.normalize(text);
            assert_eq!(normalizer.normalize(&once), once);
        }
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn test_every_reply_is_non_empty() {
        let table = ResponseTable::builtin();
        for label in LABELS {
            assert!(!table.select_reply(&Emotion::from(*label)).is_empty());
        }
    }

    #[test]
    fn test_unknown_classifier_label_gets_default_reply() {
        let result = pipeline_predicting("surprise").process("xyzzy plugh").unwrap();
        assert_eq!(result.emotion, Emotion::Other("surprise".to_string()));
        assert_eq!(result.reply, DEFAULT_REPLY);
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn test_stressed_about_exams_is_anxiety_for_any_classifier_output() {
        let expected = ResponseTable::builtin()
            .select_reply(&Emotion::Anxiety)
            .to_string();
        for label in LABELS {
            let result = pipeline_predicting(label)
                .process("I am stressed about exams")
                .unwrap();
            assert_eq!(result.emotion, Emotion::Anxiety);
            assert_eq!(result.reply, expected);
        }
    }

    #[test]
    fn test_feel_okay_today_is_calm() {
        let result = pipeline_predicting("anger").process("I feel okay today").unwrap();
        assert_eq!(result.emotion, Emotion::Calm);
    }

    #[test]
    fn test_no_keyword_uses_classifier_label() {
        for label in LABELS {
            let result = pipeline_predicting(label).process("xyzzy plugh").unwrap();
            assert_eq!(result.emotion.label(), *label);
        }
    }

    #[test]
    fn test_empty_input_rejection() {
        let pipeline = pipeline_predicting("joy");
        assert!(matches!(pipeline.process(""), Err(AppError::EmptyInput)));
        assert!(matches!(pipeline.process("   "), Err(AppError::EmptyInput)));
        let result = pipeline.process(" I am ok ").unwrap();
        assert_eq!(result.input, "I am ok");
    }

    #[test]
    fn test_result_is_deterministic() {
        let pipeline = pipeline_predicting("sadness");
        let first = pipeline.process("I miss my friends").unwrap();
        for _ in 0..10 {
            assert_eq!(pipeline.process("I miss my friends").unwrap(), first);
        }
    }
}

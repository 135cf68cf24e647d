//! Text normalization.
//!
//! Produces the cleaned token stream fed to the tokenizer: lowercase, URL-free,
//! ASCII letters only, English stopwords removed, nouns reduced to their base form.
//!
//! Non-letter characters are deleted rather than replaced by a space, so
//! `"word1word"` becomes `"wordword"`. Rule matching and the classifier see the
//! same quirk, so it is kept as is.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// English stopwords (NLTK corpus)
const STOPWORDS_EN: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Irregular plural nouns (subset of the WordNet noun exception list)
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("selves", "self"),
    ("halves", "half"),
    ("thieves", "thief"),
    ("wolves", "wolf"),
    ("shelves", "shelf"),
    ("calves", "calf"),
    ("crises", "crisis"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("phenomena", "phenomenon"),
    ("criteria", "criterion"),
    ("data", "datum"),
    ("goes", "go"),
    ("quizzes", "quiz"),
];

/// WordNet noun detachment rules: (suffix, replacement)
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Words ending in `s` that are already base forms
const INVARIANT_WORDS: &[&str] = &[
    "news", "series", "species", "lens", "physics", "mathematics", "politics", "economics",
    "always", "perhaps", "thus", "yes", "less", "unless", "across", "towards", "afterwards",
    "sometimes", "besides", "nevertheless", "whereas", "alas", "chaos", "christmas", "ethics",
];

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+").expect("Invalid regex: URL pattern"));

/// Dictionary-backed noun lemmatizer.
///
/// Candidate base forms come from the irregular exceptions or the suffix rules, and a
/// candidate only counts when it is a known lemma. The shortest known form wins, as
/// in WordNet's `morphy`. Words with no known form are returned unchanged.
///
/// The lexicon is usually the classifier vocabulary, which was built from
/// lemmatized text. Exception base forms are always known.
pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
    lexicon: HashSet<String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    /// A lemmatizer that only knows the irregular forms.
    pub fn new() -> Self {
        Self::with_lexicon(std::iter::empty::<&str>())
    }

    pub fn with_lexicon<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exceptions: HashMap<&'static str, &'static str> =
            NOUN_EXCEPTIONS.iter().copied().collect();
        let mut lexicon: HashSet<String> =
            words.into_iter().map(|w| w.as_ref().to_string()).collect();
        lexicon.extend(exceptions.values().map(|base| base.to_string()));

        Self {
            exceptions,
            invariant: INVARIANT_WORDS.iter().copied().collect(),
            lexicon,
        }
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }

    /// Shortest known form of `word`, including `word` itself.
    fn morphy(&self, word: &str) -> Option<String> {
        if self.invariant.contains(word) {
            return Some(word.to_string());
        }

        let mut forms: Vec<String> = Vec::new();
        if self.is_known(word) {
            forms.push(word.to_string());
        }
        if let Some(base) = self.exceptions.get(word) {
            forms.push((*base).to_string());
        } else {
            for (suffix, replacement) in NOUN_SUFFIX_RULES {
                let Some(stem) = word.strip_suffix(suffix) else {
                    continue;
                };
                if stem.is_empty() {
                    continue;
                }
                let candidate = format!("{}{}", stem, replacement);
                if self.is_known(&candidate) && !forms.contains(&candidate) {
                    forms.push(candidate);
                }
            }
        }

        forms.into_iter().min_by_key(|form| form.len())
    }

    /// Returns the base form of `word`, or `word` itself when it has no known lemma.
    ///
    /// A lemma is only taken when it maps to itself, so lemmatizing twice is a no-op.
    pub fn lemmatize(&self, word: &str) -> String {
        match self.morphy(word) {
            Some(lemma) if self.morphy(&lemma).as_deref() == Some(lemma.as_str()) => lemma,
            _ => word.to_string(),
        }
    }
}

/// Normalizes raw user text for the classifier.
pub struct TextNormalizer {
    stopwords: HashSet<&'static str>,
    lemmatizer: Lemmatizer,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::with_lemmatizer(Lemmatizer::new())
    }

    /// Normalizer whose lemmatizer accepts base forms found in `lexicon`.
    pub fn with_lexicon<I, S>(lexicon: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_lemmatizer(Lemmatizer::with_lexicon(lexicon))
    }

    fn with_lemmatizer(lemmatizer: Lemmatizer) -> Self {
        Self {
            stopwords: STOPWORDS_EN.iter().copied().collect(),
            lemmatizer,
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    fn lemmatize_token(&self, token: &str) -> String {
        let lemma = self.lemmatizer.lemmatize(token);
        // A lemma that collapses into a stopword would vanish on a second pass
        if self.is_stopword(&lemma) {
            token.to_string()
        } else {
            lemma
        }
    }

    /// Clean `text` into a space-joined sequence of lemmatized, non-stopword tokens.
    ///
    /// Never fails; text with no letters left yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let without_urls = URL_PATTERN.replace_all(&lowered, "");
        let letters_only: String = without_urls
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
            .collect();

        letters_only
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .map(|token| self.lemmatize_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

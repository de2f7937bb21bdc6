//! Text Normalizer: turns raw resume or job text into a filtered token stream.
//!
//! Pipeline: non-alphabetic → space, lowercase, whitespace tokenization,
//! stopword removal, closed-class POS filtering. Never fails: unusable input
//! degrades to fewer (or zero) tokens.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::text::pos::{LexiconTagger, PosTagger};
use crate::text::stopwords;

/// Ordered, filtered tokens of one document. Duplicates are kept.
///
/// Every token is lowercase ASCII alphabetic, not a stopword, and not a
/// determiner, preposition, infinitive marker, personal pronoun or wh-pronoun.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedDocument {
    tokens: Vec<String>,
}

impl NormalizedDocument {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Deduplicated, lexicographically ordered token set.
    pub fn token_set(&self) -> BTreeSet<&str> {
        self.iter().collect()
    }
}

/// Configured normalizer. Cheap to clone; the tagger is shared.
#[derive(Clone)]
pub struct Normalizer {
    tagger: Arc<dyn PosTagger>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Arc::new(LexiconTagger))
    }
}

impl Normalizer {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    pub fn normalize(&self, text: &str) -> NormalizedDocument {
        let cleaned = clean(text);

        // Only letters and spaces survive `clean`, so no sentence boundary is
        // left to split on and the stream is tagged as a single sentence.
        let candidates: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|w| !stopwords::is_stopword(w))
            .collect();
        let tags = self.tagger.tag(&candidates);

        let tokens = candidates
            .into_iter()
            .zip(tags)
            .filter(|(_, tag)| !tag.is_filtered())
            .map(|(word, _)| word.to_string())
            .collect();

        NormalizedDocument { tokens }
    }

    /// Normalizes a JSON value; anything but a string yields an empty document.
    pub fn normalize_value(&self, value: &serde_json::Value) -> NormalizedDocument {
        match value {
            serde_json::Value::String(text) => self.normalize(text),
            _ => NormalizedDocument::default(),
        }
    }
}

/// Replaces every non `[A-Za-z]` character with a space and lowercases.
fn clean(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn normalize(text: &str) -> NormalizedDocument {
        Normalizer::default().normalize(text)
    }

    fn normalize_value(value: &serde_json::Value) -> NormalizedDocument {
        Normalizer::default().normalize_value(value)
    }

    #[test]
    fn test_strips_punctuation_digits_and_case() {
        let doc = normalize("Senior PYTHON-developer, 5+ yrs (AWS)!");
        assert_eq!(doc.tokens(), ["senior", "python", "developer", "yrs", "aws"]);
    }

    #[test]
    fn test_drops_stopwords_and_closed_class_words() {
        let doc = normalize("We build every service via Rust upon request");
        assert_eq!(doc.tokens(), ["build", "service", "rust", "request"]);
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let doc = normalize("python rust python");
        assert_eq!(doc.tokens(), ["python", "rust", "python"]);
    }

    #[test]
    fn test_non_ascii_letters_become_separators() {
        let doc = normalize("café résumé");
        assert_eq!(doc.tokens(), ["caf", "r", "sum"]);
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("123 !!! ---").is_empty());
    }

    #[test]
    fn test_non_string_value_is_empty() {
        assert!(normalize_value(&json!(42)).is_empty());
        assert!(normalize_value(&json!(null)).is_empty());
        assert_eq!(normalize_value(&json!("Rust developer")).tokens().len(), 2);
    }

    #[test]
    fn test_token_set_dedups_and_sorts() {
        let doc = normalize("rust python rust aws");
        let set: Vec<&str> = doc.token_set().into_iter().collect();
        assert_eq!(set, ["aws", "python", "rust"]);
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(text in "\\PC{0,200}") {
            let once = normalize(&text);
            let twice = normalize(&once.tokens().join(" "));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_tokens_are_lowercase_alpha_and_never_grow(text in "\\PC{0,200}") {
            let doc = normalize(&text);
            let raw_tokens = text.split(|c: char| !c.is_ascii_alphabetic())
                .filter(|w| !w.is_empty())
                .count();
            prop_assert!(doc.tokens().len() <= raw_tokens);
            for token in doc.iter() {
                prop_assert!(token.chars().all(|c| c.is_ascii_lowercase()));
                prop_assert!(!stopwords::is_stopword(token));
            }
        }
    }
}

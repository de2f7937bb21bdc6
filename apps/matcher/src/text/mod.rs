// Text normalization: lexical cleanup, stopword removal, closed-class POS filtering.
// Every downstream embedder and the keyword explainer consume `NormalizedDocument`.

pub mod normalizer;
pub mod pos;
pub mod stopwords;

pub use normalizer::{NormalizedDocument, Normalizer};

/// Default-configured normalization for tests.
#[cfg(test)]
pub fn normalize(text: &str) -> NormalizedDocument {
    Normalizer::default().normalize(text)
}

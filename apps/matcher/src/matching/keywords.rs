//! Keyword Explainer: shared vocabulary between two normalized documents.

use crate::text::NormalizedDocument;

/// Sorted, deduplicated intersection of the two token sets.
pub fn common_keywords(a: &NormalizedDocument, b: &NormalizedDocument) -> Vec<String> {
    let right = b.token_set();
    a.token_set()
        .intersection(&right)
        .map(|t| t.to_string())
        .collect()
}

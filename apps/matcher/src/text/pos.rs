//! Closed-class part-of-speech tagging.
//!
//! The normalizer only needs to recognise five closed word classes (Penn tags
//! DT, IN, TO, PRP, WP). Their membership is a finite list, so the tagger is a
//! lexicon lookup: anything outside the lexicon is an open-class `Other`.

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech tag. Only the filtered classes are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    /// DT
    Determiner,
    /// IN, prepositions and subordinating conjunctions.
    Preposition,
    /// TO
    InfinitiveMarker,
    /// PRP
    PersonalPronoun,
    /// WP
    WhPronoun,
    Other,
}

impl PosTag {
    /// Whether the normalizer drops tokens carrying this tag.
    pub fn is_filtered(self) -> bool {
        !matches!(self, PosTag::Other)
    }
}

/// Assigns one tag per token. Implementations must be deterministic.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[&str]) -> Vec<PosTag>;
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "all", "any", "both", "each", "every",
    "either", "neither", "some", "no", "another",
];

const PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "amid", "among", "amongst",
    "around", "as", "at", "because", "before", "behind", "below", "beneath", "beside",
    "besides", "between", "beyond", "by", "despite", "during", "except", "for", "from", "if",
    "in", "into", "of", "on", "onto", "per", "since", "than", "though", "although", "through",
    "throughout", "till", "toward", "towards", "under", "underneath", "unless", "unlike",
    "until", "upon", "via", "whereas", "whether", "while", "whilst", "with", "within",
    "without", "albeit",
];

const PERSONAL_PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "her", "it", "we", "us", "they", "them", "myself",
    "yourself", "yourselves", "himself", "herself", "itself", "ourselves", "themselves",
    "oneself",
];

const WH_PRONOUNS: &[&str] = &["who", "whom", "what", "whoever", "whomever"];

/// Lexicon-backed tagger for the closed classes above.
///
/// Ambiguous members ("that", "as") resolve in the order determiner,
/// preposition, pronoun; every one of them is filtered either way.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn tag_word(word: &str) -> PosTag {
        if word == "to" {
            PosTag::InfinitiveMarker
        } else if DETERMINERS.contains(&word) {
            PosTag::Determiner
        } else if PREPOSITIONS.contains(&word) {
            PosTag::Preposition
        } else if PERSONAL_PRONOUNS.contains(&word) {
            PosTag::PersonalPronoun
        } else if WH_PRONOUNS.contains(&word) {
            PosTag::WhPronoun
        } else {
            PosTag::Other
        }
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[&str]) -> Vec<PosTag> {
        tokens.iter().map(|t| Self::tag_word(t)).collect()
    }
}

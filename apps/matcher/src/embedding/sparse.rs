//! Sparse Embedder: TF-IDF over a bounded unigram + bigram vocabulary.
//!
//! `fit` runs once at corpus-build time; `transform` runs per request and only
//! reads the fitted state. A resume vector is only comparable with corpus
//! vectors produced by the same fitted vectorizer.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::embedding::{EmbeddingMatrix, ShapeError, SimilarityModel};
use crate::text::{stopwords, NormalizedDocument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfConfig {
    /// Vocabulary cap; the most frequent terms corpus-wide are kept.
    pub max_features: Option<usize>,
    /// Inclusive n-gram range, (1, 2) = unigrams and bigrams.
    pub ngram_range: (usize, usize),
    /// Tokens shorter than this are ignored before n-gram generation.
    pub min_token_len: usize,
    pub remove_stopwords: bool,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: Some(5000),
            ngram_range: (1, 2),
            min_token_len: 2,
            remove_stopwords: true,
        }
    }
}

/// Fitted vocabulary and idf weights. Immutable once fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    /// term → column, columns assigned in alphabetical term order.
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
    /// Number of documents the vectorizer was fitted on.
    documents: usize,
}

impl TfidfVectorizer {
    /// Fits vocabulary and smoothed idf on the corpus.
    ///
    /// idf(t) = ln((1 + n) / (1 + df(t))) + 1, so a term present in every
    /// document keeps the minimum weight of 1 per occurrence.
    pub fn fit(corpus: &[NormalizedDocument], config: TfidfConfig) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freq: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let terms = analyze(&config, doc);
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
            for term in terms {
                *term_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut kept: Vec<(String, usize)> = term_freq.into_iter().collect();
        if let Some(limit) = config.max_features {
            // Highest corpus frequency first, alphabetical among ties.
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(limit);
        }
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let n = corpus.len() as f32;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (column, (term, _)) in kept.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f32;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        Self {
            config,
            vocabulary,
            idf,
            documents: corpus.len(),
        }
    }

    /// Fits on the corpus and returns its row-aligned TF-IDF matrix.
    pub fn fit_transform(
        corpus: &[NormalizedDocument],
        config: TfidfConfig,
    ) -> Result<(Self, EmbeddingMatrix), ShapeError> {
        let vectorizer = Self::fit(corpus, config);
        let rows = corpus.iter().map(|doc| vectorizer.transform(doc)).collect();
        let matrix = EmbeddingMatrix::from_rows(rows, vectorizer.dimension())?;
        Ok((vectorizer, matrix))
    }

    /// L2-normalized TF-IDF vector. Out-of-vocabulary terms are dropped.
    pub fn transform(&self, doc: &NormalizedDocument) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.idf.len()];
        for term in analyze(&self.config, doc) {
            if let Some(column) = self.column(&term) {
                vector[column] += self.idf[column];
            }
        }
        l2_normalize(&mut vector);
        vector
    }

    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

impl SimilarityModel for TfidfVectorizer {
    fn name(&self) -> &'static str {
        "sparse"
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn embed(&self, doc: &NormalizedDocument) -> Vec<f32> {
        self.transform(doc)
    }
}

/// Filters tokens, then emits every n-gram in the configured range.
fn analyze(config: &TfidfConfig, doc: &NormalizedDocument) -> Vec<String> {
    let tokens: Vec<&str> = doc
        .iter()
        .filter(|t| t.chars().count() >= config.min_token_len)
        .filter(|t| !config.remove_stopwords || !stopwords::is_stopword(t))
        .collect();

    let (min_n, max_n) = config.ngram_range;
    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

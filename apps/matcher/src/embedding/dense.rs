//! Dense Embedder: bag-of-vectors mean over a pretrained word-embedding table.

use std::collections::HashMap;

use crate::embedding::{ShapeError, SimilarityModel};
use crate::text::NormalizedDocument;

/// Pretrained word vectors, stored contiguously (`index[word]` is a row).
#[derive(Debug, Clone, Default)]
pub struct WordVectors {
    dimension: usize,
    index: HashMap<String, usize>,
    data: Vec<f32>,
}

impl WordVectors {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            index: HashMap::new(),
            data: Vec::new(),
        }
    }

    /// Adds or replaces the vector for `word`.
    pub fn insert(&mut self, word: impl Into<String>, vector: &[f32]) -> Result<(), ShapeError> {
        let word = word.into();
        if vector.len() != self.dimension {
            return Err(ShapeError::WordVectorLength {
                word,
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        match self.index.get(&word) {
            Some(&row) => {
                let start = row * self.dimension;
                self.data[start..start + self.dimension].copy_from_slice(vector);
            }
            None => {
                self.index.insert(word, self.index.len());
                self.data.extend_from_slice(vector);
            }
        }
        Ok(())
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&row| {
            let start = row * self.dimension;
            &self.data[start..start + self.dimension]
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn vocabulary_len(&self) -> usize {
        self.index.len()
    }

    /// Element-wise mean of the vectors of every in-vocabulary token.
    ///
    /// Tokens missing from the table are skipped; repeated tokens count once
    /// per occurrence. No matching token gives the zero vector.
    pub fn embed_dense(&self, doc: &NormalizedDocument) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.dimension];
        let mut found = 0usize;
        for vector in doc.iter().filter_map(|token| self.get(token)) {
            for (acc, v) in sum.iter_mut().zip(vector) {
                *acc += v;
            }
            found += 1;
        }
        if found > 0 {
            let n = found as f32;
            for acc in &mut sum {
                *acc /= n;
            }
        }
        sum
    }
}

impl SimilarityModel for WordVectors {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, doc: &NormalizedDocument) -> Vec<f32> {
        self.embed_dense(doc)
    }
}

//! Document embeddings and the similarity primitives they share.
//!
//! Two representations implement `SimilarityModel`:
//! - `WordVectors`: dense semantic vectors (mean of per-token word embeddings)
//! - `TfidfVectorizer`: sparse lexical vectors over a fitted vocabulary
//!
//! Job-side vectors are held as a row-major `EmbeddingMatrix`, row-aligned
//! with the job record table.

pub mod dense;
pub mod sparse;

use thiserror::Error;

use crate::text::NormalizedDocument;

pub use dense::WordVectors;
pub use sparse::{TfidfConfig, TfidfVectorizer};

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("expected {expected} values for a {rows}x{cols} matrix, got {actual}")]
    DataLength {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("vector for '{word}' has {actual} components, expected {expected}")]
    WordVectorLength {
        word: String,
        expected: usize,
        actual: usize,
    },
}

/// A document representation that can be compared by cosine similarity.
///
/// The hybrid scorer only depends on this capability, so a further
/// representation can be added without touching it.
pub trait SimilarityModel: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Length of every vector produced by `embed`.
    fn dimension(&self) -> usize;

    fn embed(&self, doc: &NormalizedDocument) -> Vec<f32>;
}

/// Cosine similarity. Defined as 0.0 when either vector has zero norm, so a
/// degenerate document never yields NaN.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f32::MIN_POSITIVE || !denom.is_finite() {
        return 0.0;
    }
    dot / denom
}

/// Dense row-major matrix; one row per job.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddingMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl EmbeddingMatrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, ShapeError> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(ShapeError::DataLength {
                rows,
                cols,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Stacks equal-length rows. An empty input gives a 0 x `cols` matrix.
    pub fn from_rows(rows: Vec<Vec<f32>>, cols: usize) -> Result<Self, ShapeError> {
        let mut data = Vec::with_capacity(rows.len() * cols);
        let count = rows.len();
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(ShapeError::RaggedRow {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            rows: count,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).filter_map(move |i| self.row(i))
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn similarities(&self, query: &[f32]) -> Vec<f32> {
        self.iter_rows().map(|row| cosine(query, row)).collect()
    }
}

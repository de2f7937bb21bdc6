//! Hybrid Scorer: weighted sum of per-representation cosine similarities.
//!
//! score[i] = w_sparse * cos(resume_sparse, sparse[i]) + w_dense * cos(resume_dense, dense[i])

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::embedding::{EmbeddingMatrix, SimilarityModel};
use crate::text::NormalizedDocument;

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weights must be finite and non-negative (sparse={sparse}, dense={dense})")]
    OutOfRange { sparse: f32, dense: f32 },

    #[error("weights must sum to 1, got {sum}")]
    NotNormalized { sum: f32 },
}

/// Process-wide hybrid weights. Hand-tuned constants, not derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    sparse: f32,
    dense: f32,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            sparse: 0.6,
            dense: 0.4,
        }
    }
}

impl HybridWeights {
    pub fn new(sparse: f32, dense: f32) -> Result<Self, WeightsError> {
        let valid = |w: f32| w.is_finite() && w >= 0.0;
        if !valid(sparse) || !valid(dense) {
            return Err(WeightsError::OutOfRange { sparse, dense });
        }
        let sum = sparse + dense;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(WeightsError::NotNormalized { sum });
        }
        Ok(Self { sparse, dense })
    }

    pub fn sparse(&self) -> f32 {
        self.sparse
    }

    pub fn dense(&self) -> f32 {
        self.dense
    }
}

/// One representation taking part in a hybrid score.
pub struct Channel<'a> {
    pub model: &'a dyn SimilarityModel,
    pub matrix: &'a EmbeddingMatrix,
    pub weight: f32,
}

/// Scores a document through any number of representations.
///
/// Each channel embeds the document with its own model and contributes its
/// weighted cosine column; channels are summed in the order given.
pub struct HybridScorer<'a> {
    channels: Vec<Channel<'a>>,
}

impl<'a> HybridScorer<'a> {
    pub fn new(channels: Vec<Channel<'a>>) -> Self {
        Self { channels }
    }

    /// The standard lexical + semantic pair.
    pub fn sparse_dense(
        sparse_model: &'a dyn SimilarityModel,
        sparse_matrix: &'a EmbeddingMatrix,
        dense_model: &'a dyn SimilarityModel,
        dense_matrix: &'a EmbeddingMatrix,
        weights: HybridWeights,
    ) -> Self {
        Self::new(vec![
            Channel {
                model: sparse_model,
                matrix: sparse_matrix,
                weight: weights.sparse,
            },
            Channel {
                model: dense_model,
                matrix: dense_matrix,
                weight: weights.dense,
            },
        ])
    }

    /// One score per corpus row. Rows = the smallest channel matrix.
    pub fn score(&self, doc: &NormalizedDocument) -> Vec<f32> {
        let rows = self
            .channels
            .iter()
            .map(|c| c.matrix.rows())
            .min()
            .unwrap_or(0);
        let mut scores = vec![0.0f32; rows];
        for channel in &self.channels {
            let query = channel.model.embed(doc);
            trace!(
                channel = channel.model.name(),
                dimension = channel.model.dimension(),
                "Scoring channel"
            );
            for (acc, sim) in scores.iter_mut().zip(channel.matrix.similarities(&query)) {
                *acc += channel.weight * sim;
            }
        }
        scores
    }
}

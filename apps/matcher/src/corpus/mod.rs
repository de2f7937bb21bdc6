//! Serving corpus: job records, precomputed matrices, fitted models.
//!
//! Loaded once at startup into an immutable `MatchContext` shared by every
//! request. Any artifact problem here is a `CorpusError` and fatal to startup.

pub mod build;
pub mod context;
pub mod loader;
pub mod locations;
pub mod models;

#[cfg(test)]
pub mod fixtures;

use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::ShapeError;

pub use context::{CorpusArtifacts, MatchContext};
pub use models::{JobRecord, ScoredJob};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("{what}: expected {expected}, found {actual}")]
    Misaligned {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("corpus is empty after filtering")]
    Empty,
}

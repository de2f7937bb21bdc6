//! Title/location search over the job record table.
//!
//! Independent of the embeddings: filtering, partial-ratio fuzzy scoring, and
//! pagination over the static corpus.

pub mod fuzzy;
pub mod partial_ratio;

pub use fuzzy::{search, SearchConfig, SearchError, SearchResults};

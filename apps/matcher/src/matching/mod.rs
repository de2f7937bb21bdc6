// Matching engine: hybrid scoring, top-K ranking, keyword explanation.
// Pure, CPU-bound functions; handlers run them inside spawn_blocking.

pub mod hybrid;
pub mod keywords;
pub mod ranker;

pub use hybrid::{HybridScorer, HybridWeights};
pub use keywords::common_keywords;
pub use ranker::top_k;

//! `MatchContext`: the explicitly constructed, read-only serving state.
//!
//! Request handlers receive it through `Arc` and never mutate it, so
//! concurrent requests need no locking.

use tracing::debug;

use crate::corpus::{CorpusError, JobRecord, ScoredJob};
use crate::embedding::{EmbeddingMatrix, TfidfVectorizer, WordVectors};
use crate::matching::{common_keywords, top_k, HybridScorer, HybridWeights};
use crate::search::{self, SearchConfig, SearchError, SearchResults};
use crate::text::{NormalizedDocument, Normalizer};

/// Everything the loader (or corpus build) hands over at startup.
pub struct CorpusArtifacts {
    pub jobs: Vec<JobRecord>,
    pub word_vectors: WordVectors,
    pub vectorizer: TfidfVectorizer,
    pub dense_matrix: EmbeddingMatrix,
    pub sparse_matrix: EmbeddingMatrix,
}

pub struct MatchContext {
    jobs: Vec<JobRecord>,
    word_vectors: WordVectors,
    vectorizer: TfidfVectorizer,
    dense_matrix: EmbeddingMatrix,
    sparse_matrix: EmbeddingMatrix,
    normalizer: Normalizer,
    weights: HybridWeights,
}

impl MatchContext {
    /// Validates row alignment and dimensions, then freezes the corpus.
    pub fn new(artifacts: CorpusArtifacts, weights: HybridWeights) -> Result<Self, CorpusError> {
        let CorpusArtifacts {
            mut jobs,
            word_vectors,
            vectorizer,
            dense_matrix,
            sparse_matrix,
        } = artifacts;

        check("dense matrix rows vs job records", jobs.len(), dense_matrix.rows())?;
        check("sparse matrix rows vs job records", jobs.len(), sparse_matrix.rows())?;
        check(
            "dense matrix columns vs word-vector dimension",
            word_vectors.dimension(),
            dense_matrix.cols(),
        )?;
        check(
            "sparse matrix columns vs vectorizer vocabulary",
            vectorizer.dimension(),
            sparse_matrix.cols(),
        )?;

        for (row, job) in jobs.iter_mut().enumerate() {
            job.row = row;
        }

        Ok(Self {
            jobs,
            word_vectors,
            vectorizer,
            dense_matrix,
            sparse_matrix,
            normalizer: Normalizer::default(),
            weights,
        })
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.dimension()
    }

    pub fn dense_dimension(&self) -> usize {
        self.word_vectors.dimension()
    }

    pub fn normalize(&self, text: &str) -> NormalizedDocument {
        self.normalizer.normalize(text)
    }

    fn scorer(&self) -> HybridScorer<'_> {
        HybridScorer::sparse_dense(
            &self.vectorizer,
            &self.sparse_matrix,
            &self.word_vectors,
            &self.dense_matrix,
            self.weights,
        )
    }

    /// Hybrid score of `doc` against every job, in row order.
    pub fn score(&self, doc: &NormalizedDocument) -> Vec<f32> {
        self.scorer().score(doc)
    }

    /// normalize → embed → score → rank.
    pub fn match_resume(&self, resume_text: &str, k: usize) -> Vec<ScoredJob> {
        let doc = self.normalize(resume_text);
        debug!(tokens = doc.tokens().len(), k, "Scoring resume");
        let scores = self.score(&doc);
        top_k(&scores, k)
            .into_iter()
            .filter_map(|(row, score)| {
                self.jobs.get(row).map(|job| ScoredJob {
                    job: job.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Keywords shared by the resume and a job description.
    ///
    /// A non-string description normalizes to nothing and shares no keywords.
    pub fn explain(&self, resume_text: &str, job_description: &serde_json::Value) -> Vec<String> {
        let resume = self.normalize(resume_text);
        let job = self.normalizer.normalize_value(job_description);
        common_keywords(&resume, &job)
    }

    pub fn search(
        &self,
        title_query: Option<&str>,
        location_query: Option<&str>,
        page: i64,
        config: SearchConfig,
    ) -> Result<SearchResults, SearchError> {
        search::search(&self.jobs, title_query, location_query, page, config)
    }
}

fn check(what: &'static str, expected: usize, actual: usize) -> Result<(), CorpusError> {
    if expected != actual {
        return Err(CorpusError::Misaligned {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::{python_resume, tiny_artifacts, tiny_context};
    use serde_json::json;

    #[test]
    fn test_overlapping_job_ranks_first() {
        let ctx = tiny_context();
        let ranked = ctx.match_resume(python_resume(), 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].job.job_id, 101);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_resume_without_usable_tokens_scores_zero() {
        let ctx = tiny_context();
        let scores = ctx.score(&ctx.normalize("the of and 1234 !!!"));
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_out_of_vocabulary_resume_scores_zero() {
        let ctx = tiny_context();
        let scores = ctx.score(&ctx.normalize("zyxwv qwerty"));
        assert!(scores.iter().all(|s| *s == 0.0 && !s.is_nan()));
    }

    #[test]
    fn test_top_k_truncates() {
        let ctx = tiny_context();
        assert_eq!(ctx.match_resume(python_resume(), 1).len(), 1);
        assert!(ctx.match_resume(python_resume(), 0).is_empty());
    }

    #[test]
    fn test_rows_are_assigned_from_table_order() {
        let ctx = tiny_context();
        let rows: Vec<usize> = ctx.jobs().iter().map(|j| j.row).collect();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_explain_lists_shared_keywords() {
        let ctx = tiny_context();
        let keywords = ctx.explain(
            python_resume(),
            &json!("Python backend services on AWS for a senior developer"),
        );
        assert_eq!(keywords, ["aws", "backend", "developer", "python", "senior"]);
        assert!(ctx.explain(python_resume(), &json!(17)).is_empty());
    }

    #[test]
    fn test_search_over_context_records() {
        let ctx = tiny_context();
        let r = ctx
            .search(Some("python"), None, 1, SearchConfig::default())
            .unwrap();
        assert_eq!(r.total_results, 1);
        assert_eq!(r.results[0].job_id, 101);
    }

    #[test]
    fn test_rejects_misaligned_matrices() {
        let mut artifacts = tiny_artifacts();
        artifacts.jobs.pop();
        let err = MatchContext::new(artifacts, HybridWeights::default())
            .err()
            .expect("row count mismatch is rejected");
        assert!(matches!(err, CorpusError::Misaligned { expected: 1, actual: 2, .. }));
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let mut artifacts = tiny_artifacts();
        artifacts.word_vectors = WordVectors::new(7);
        let err = MatchContext::new(artifacts, HybridWeights::default())
            .err()
            .expect("dimension mismatch is rejected");
        assert!(matches!(err, CorpusError::Misaligned { expected: 7, .. }));
    }
}

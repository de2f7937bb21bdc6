//! Offline corpus build: filter raw postings, normalize descriptions, fit
//! the sparse vectorizer and precompute both embedding matrices.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::info;

use crate::corpus::locations::LocationAssignment;
use crate::corpus::loader::{self, ArtifactPaths};
#[cfg(test)]
use crate::corpus::CorpusArtifacts;
use crate::corpus::{CorpusError, JobRecord};
use crate::embedding::{EmbeddingMatrix, TfidfConfig, TfidfVectorizer, WordVectors};
use crate::text::{NormalizedDocument, Normalizer};

pub const DEFAULT_INDUSTRIES: &[&str] = &[
    "IT Services and IT Consulting",
    "Financial Services",
    "Real Estate",
    "Banking",
];

/// One row of the raw postings export. Everything but the id may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPosting {
    pub job_id: i64,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyIndustry {
    pub company_id: i64,
    pub industry: String,
}

/// Keeps postings whose company is in one of `industries` and that carry a
/// non-blank description. A company listed under several wanted industries
/// still yields one record per posting. Generated locations replace any
/// location on the raw posting.
pub fn select_postings(
    postings: Vec<RawPosting>,
    company_industries: &[CompanyIndustry],
    industries: &[String],
    locations: &[LocationAssignment],
) -> Vec<JobRecord> {
    let wanted: HashSet<&str> = industries.iter().map(String::as_str).collect();
    let companies: HashSet<i64> = company_industries
        .iter()
        .filter(|ci| wanted.contains(ci.industry.as_str()))
        .map(|ci| ci.company_id)
        .collect();

    let mut location_by_job: HashMap<i64, &str> = HashMap::new();
    for assignment in locations {
        location_by_job
            .entry(assignment.job_id)
            .or_insert(assignment.location.as_str());
    }

    postings
        .into_iter()
        .filter(|p| p.company_id.is_some_and(|id| companies.contains(&id)))
        .filter_map(|p| {
            let description = p.description.filter(|d| !d.trim().is_empty())?;
            let location = location_by_job
                .get(&p.job_id)
                .map(|l| l.to_string())
                .or(p.location);
            Some(JobRecord {
                job_id: p.job_id,
                company_id: p.company_id,
                company_name: p.company_name,
                title: p.title.unwrap_or_default(),
                description,
                location,
                row: 0,
            })
        })
        .enumerate()
        .map(|(row, mut job)| {
            job.row = row;
            job
        })
        .collect()
}

/// Output of a corpus build, row-aligned with `jobs`.
#[derive(Debug, Clone)]
pub struct BuiltCorpus {
    pub jobs: Vec<JobRecord>,
    pub vectorizer: TfidfVectorizer,
    pub dense_matrix: EmbeddingMatrix,
    pub sparse_matrix: EmbeddingMatrix,
}

impl BuiltCorpus {
    pub fn write(&self, out_dir: &Path) -> Result<ArtifactPaths, CorpusError> {
        loader::write_artifacts(
            out_dir,
            &self.jobs,
            &self.dense_matrix,
            &self.sparse_matrix,
            &self.vectorizer,
        )
    }

    #[cfg(test)]
    pub fn into_artifacts(self, word_vectors: WordVectors) -> CorpusArtifacts {
        CorpusArtifacts {
            jobs: self.jobs,
            word_vectors,
            vectorizer: self.vectorizer,
            dense_matrix: self.dense_matrix,
            sparse_matrix: self.sparse_matrix,
        }
    }
}

pub fn build_corpus(
    mut jobs: Vec<JobRecord>,
    word_vectors: &WordVectors,
    normalizer: &Normalizer,
    config: TfidfConfig,
) -> Result<BuiltCorpus, CorpusError> {
    if jobs.is_empty() {
        return Err(CorpusError::Empty);
    }
    for (row, job) in jobs.iter_mut().enumerate() {
        job.row = row;
    }

    let documents: Vec<NormalizedDocument> = jobs
        .par_iter()
        .map(|job| normalizer.normalize(&job.description))
        .collect();
    info!(documents = documents.len(), "Normalized job descriptions");

    let (vectorizer, sparse_matrix) = TfidfVectorizer::fit_transform(&documents, config)?;
    info!(
        vocabulary = vectorizer.dimension(),
        documents = vectorizer.documents(),
        "Fitted TF-IDF vectorizer"
    );

    let dense_rows: Vec<Vec<f32>> = documents
        .par_iter()
        .map(|doc| word_vectors.embed_dense(doc))
        .collect();
    let dense_matrix = EmbeddingMatrix::from_rows(dense_rows, word_vectors.dimension())?;
    info!(dimension = dense_matrix.cols(), "Computed dense embeddings");

    Ok(BuiltCorpus {
        jobs,
        vectorizer,
        dense_matrix,
        sparse_matrix,
    })
}

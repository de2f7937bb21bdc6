//! Two-job corpus shared by tests: one Python backend role, one nursing role,
//! with word vectors that put tech and medical words on orthogonal axes.

use crate::corpus::build::build_corpus;
use crate::corpus::loader::parse_word_vectors;
use crate::corpus::{CorpusArtifacts, JobRecord, MatchContext};
use crate::embedding::{TfidfConfig, WordVectors};
use crate::matching::HybridWeights;
use crate::text::Normalizer;

pub fn word_vectors_text() -> &'static str {
    "11 4\n\
     python 1 0 0 0\n\
     developer 0.9 0.1 0 0\n\
     backend 0.8 0.2 0 0\n\
     aws 0.7 0.3 0 0\n\
     senior 0.5 0.5 0 0\n\
     services 0.6 0.4 0 0\n\
     experience 0.4 0.4 0.1 0.1\n\
     nurse 0 0 1 0\n\
     hospital 0 0 0.9 0.1\n\
     ward 0 0 0.8 0.2\n\
     care 0 0 0.7 0.3\n"
}

pub fn tiny_word_vectors() -> WordVectors {
    parse_word_vectors(
        std::io::Cursor::new(word_vectors_text()),
        std::path::Path::new("fixture.txt"),
    )
    .unwrap()
}

pub fn tiny_jobs() -> Vec<JobRecord> {
    vec![
        JobRecord {
            job_id: 101,
            company_id: Some(1),
            company_name: Some("Cloudworks".to_string()),
            title: "Senior Python Developer".to_string(),
            description: "Senior Python backend developer role building AWS services. Python experience required."
                .to_string(),
            location: Some("Bengaluru".to_string()),
            row: 0,
        },
        JobRecord {
            job_id: 202,
            company_id: Some(2),
            company_name: Some("City Hospital".to_string()),
            title: "Registered Nurse".to_string(),
            description: "Registered nurse for hospital ward care shifts.".to_string(),
            location: Some("Mumbai".to_string()),
            row: 1,
        },
    ]
}

pub fn python_resume() -> &'static str {
    "Looking for a senior python backend developer with AWS experience"
}

pub fn tiny_artifacts() -> CorpusArtifacts {
    let word_vectors = tiny_word_vectors();
    build_corpus(
        tiny_jobs(),
        &word_vectors,
        &Normalizer::default(),
        TfidfConfig::default(),
    )
    .unwrap()
    .into_artifacts(word_vectors)
}

pub fn tiny_context() -> MatchContext {
    MatchContext::new(tiny_artifacts(), HybridWeights::default()).unwrap()
}

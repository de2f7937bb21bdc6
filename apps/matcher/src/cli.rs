use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::corpus::build::{self, CompanyIndustry, RawPosting, DEFAULT_INDUSTRIES};
use crate::corpus::loader;
use crate::corpus::locations::{self, LocationAssignment};
use crate::embedding::TfidfConfig;
use crate::text::Normalizer;

#[derive(Parser)]
#[command(name = "matcher", version, about = "Resume-to-job matching service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the corpus artifacts and serve the HTTP API (default)
    Serve,
    /// Filter raw postings and precompute the serving artifacts
    BuildCorpus(BuildCorpusArgs),
    /// Assign synthetic city locations to postings
    GenerateLocations(GenerateLocationsArgs),
}

#[derive(Args)]
pub struct BuildCorpusArgs {
    /// JSON array of raw postings
    #[arg(long)]
    pub postings: PathBuf,
    /// JSON array of {company_id, industry}
    #[arg(long)]
    pub industries: PathBuf,
    /// Output of `generate-locations`
    #[arg(long)]
    pub locations: Option<PathBuf>,
    /// Word vectors in word2vec text format
    #[arg(long)]
    pub word_vectors: PathBuf,
    #[arg(long, default_value = "data")]
    pub out: PathBuf,
    /// Industry to keep; repeatable. Defaults to the built-in list
    #[arg(long = "industry")]
    pub industry: Vec<String>,
    #[arg(long, default_value_t = 5000)]
    pub max_features: usize,
}

#[derive(Args)]
pub struct GenerateLocationsArgs {
    #[arg(long)]
    pub postings: PathBuf,
    #[arg(long)]
    pub out: PathBuf,
    /// Seed for a reproducible assignment
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_build_corpus(args: &BuildCorpusArgs) -> Result<()> {
    let started = Instant::now();

    let postings: Vec<RawPosting> = loader::read_json(&args.postings)?;
    let company_industries: Vec<CompanyIndustry> = loader::read_json(&args.industries)?;
    let assigned: Vec<LocationAssignment> = match &args.locations {
        Some(path) => loader::read_json(path)?,
        None => Vec::new(),
    };
    let industries: Vec<String> = if args.industry.is_empty() {
        DEFAULT_INDUSTRIES.iter().map(|s| s.to_string()).collect()
    } else {
        args.industry.clone()
    };
    info!(
        postings = postings.len(),
        locations = assigned.len(),
        ?industries,
        "Read raw corpus inputs"
    );

    let jobs = build::select_postings(postings, &company_industries, &industries, &assigned);
    info!(jobs = jobs.len(), "Selected postings");

    let word_vectors = loader::read_word_vectors(&args.word_vectors)?;
    let config = TfidfConfig {
        max_features: Some(args.max_features),
        ..TfidfConfig::default()
    };
    let built = build::build_corpus(jobs, &word_vectors, &Normalizer::default(), config)?;
    let paths = built.write(&args.out)?;

    info!(
        jobs = built.jobs.len(),
        out = %args.out.display(),
        jobs_file = %paths.jobs.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Corpus build complete"
    );
    Ok(())
}

pub fn run_generate_locations(args: &GenerateLocationsArgs) -> Result<()> {
    let postings: Vec<RawPosting> = loader::read_json(&args.postings)?;
    let job_ids = locations::unique_job_ids(postings.iter().map(|p| p.job_id));

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let assignments = locations::assign_locations(&job_ids, &mut rng);
    loader::write_json(&args.out, &assignments)
        .with_context(|| format!("writing locations to {}", args.out.display()))?;

    info!(
        jobs = assignments.len(),
        out = %args.out.display(),
        "Generated job locations"
    );
    Ok(())
}

/// Runs a file-to-file command. Blocking; needs no serving configuration.
pub fn run_offline(command: Command) -> Result<()> {
    match command {
        Command::BuildCorpus(args) => run_build_corpus(&args),
        Command::GenerateLocations(args) => run_generate_locations(&args),
        Command::Serve => bail!("serve is not an offline command"),
    }
}

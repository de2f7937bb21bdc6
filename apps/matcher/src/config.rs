use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::HybridWeights;
use crate::search::SearchConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a present but unparsable value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub word_vectors_path: PathBuf,
    pub weights: HybridWeights,
    pub match_top_k: usize,
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 5001,
            rust_log: "info".to_string(),
            data_dir: PathBuf::from("data"),
            word_vectors_path: PathBuf::from("models/word_vectors.txt"),
            weights: HybridWeights::default(),
            match_top_k: 5,
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Log level for the `matcher` target. Reads nothing else, so offline
    /// commands start even when the serving variables are invalid.
    pub fn log_level() -> String {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        std::env::var("RUST_LOG").unwrap_or_else(|_| Config::default().rust_log)
    }

    pub fn from_env() -> Result<Self> {
        let rust_log = Config::log_level();
        let defaults = Config::default();
        let sparse = parse_env("SPARSE_WEIGHT", defaults.weights.sparse())?;
        let dense = parse_env("DENSE_WEIGHT", defaults.weights.dense())?;

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log,
            data_dir: std::env::var("MATCHER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            word_vectors_path: std::env::var("WORD_VECTORS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.word_vectors_path),
            weights: HybridWeights::new(sparse, dense)
                .context("SPARSE_WEIGHT and DENSE_WEIGHT must be non-negative and sum to 1")?,
            match_top_k: parse_env("MATCH_TOP_K", defaults.match_top_k)?,
            search: SearchConfig {
                threshold: parse_env("FUZZY_THRESHOLD", defaults.search.threshold)?,
                page_size: parse_env("SEARCH_PAGE_SIZE", defaults.search.page_size)?,
            },
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

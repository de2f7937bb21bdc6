mod cli;
mod config;
mod corpus;
mod embedding;
mod errors;
mod matching;
mod resume;
mod routes;
mod search;
mod state;
mod text;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::corpus::{loader, MatchContext};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize structured logging
    let level = Config::log_level();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        // Serving configuration fails fast on unparsable env vars
        Command::Serve => serve(Config::from_env()?).await,
        offline => tokio::task::spawn_blocking(move || cli::run_offline(offline))
            .await
            .context("offline task failed")?,
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    // Load the corpus once; any artifact problem is fatal before binding.
    let data_dir = config.data_dir.clone();
    let word_vectors_path = config.word_vectors_path.clone();
    let weights = config.weights;
    let context = tokio::task::spawn_blocking(move || {
        let artifacts = loader::load_artifacts(&data_dir, &word_vectors_path)?;
        MatchContext::new(artifacts, weights)
    })
    .await
    .context("corpus loading task failed")?
    .context("failed to load corpus artifacts")?;

    info!(
        jobs = context.jobs().len(),
        vocabulary = context.vocabulary_size(),
        dimension = context.dense_dimension(),
        sparse_weight = weights.sparse(),
        dense_weight = weights.dense(),
        "Corpus ready"
    );

    // Build app state
    let state = AppState {
        context: Arc::new(context),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

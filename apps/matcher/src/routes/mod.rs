pub mod health;
pub mod jobs;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/match-jobs", post(jobs::handle_match_jobs))
        .route("/explain-match", post(jobs::handle_explain_match))
        .route("/search-jobs", get(jobs::handle_search_jobs))
        .fallback(not_found)
        .with_state(state)
}

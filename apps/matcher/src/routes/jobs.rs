//! Matching, explanation and search endpoints.
//!
//! Every handler clones the shared `Arc<MatchContext>` into a blocking task;
//! acquisition, normalization and scoring never run on the async executor.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::corpus::ScoredJob;
use crate::errors::AppError;
use crate::resume::{resume_text, ResumePayload};
use crate::search::{SearchError, SearchResults};
use crate::state::AppState;

const MISSING_RESUME: &str = "Missing or invalid resume data in request";
const MISSING_JOB_DESCRIPTION: &str = "Missing 'job_description_text'";

fn missing_resume() -> AppError {
    AppError::Validation(MISSING_RESUME.to_string())
}

async fn run_blocking<T, F>(what: &'static str, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {what}: {e}")))
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(flatten)]
    pub resume: ResumePayload,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedJob {
    pub job_id: i64,
    pub title: String,
    pub company_name: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub similarity_score: f32,
}

impl From<ScoredJob> for MatchedJob {
    fn from(scored: ScoredJob) -> Self {
        let job = scored.job;
        MatchedJob {
            job_id: job.job_id,
            title: job.title,
            company_name: job.company_name,
            description: job.description,
            location: job.location,
            similarity_score: scored.score,
        }
    }
}

/// POST /match-jobs
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<Vec<MatchedJob>>, AppError> {
    let Json(req) = payload.map_err(|_| missing_resume())?;
    let k = req.top_k.unwrap_or(state.config.match_top_k);
    let context = state.context.clone();

    let matches = run_blocking("match-jobs", move || {
        let text = resume_text(&req.resume)?;
        Some(context.match_resume(&text, k))
    })
    .await?
    .ok_or_else(missing_resume)?;

    debug!(k, returned = matches.len(), "Matched resume against corpus");
    Ok(Json(matches.into_iter().map(MatchedJob::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    #[serde(flatten)]
    pub resume: ResumePayload,
    #[serde(default)]
    pub job_description_text: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResponse {
    pub matching_keywords: Vec<String>,
}

/// null, false, 0, "" and empty containers count as absent.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// POST /explain-match
pub async fn handle_explain_match(
    State(state): State<AppState>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, AppError> {
    let Json(req) = payload.map_err(|_| missing_resume())?;
    let context = state.context.clone();

    let matching_keywords = run_blocking("explain-match", move || {
        let text = resume_text(&req.resume).ok_or_else(missing_resume)?;
        let job_description = req
            .job_description_text
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation(MISSING_JOB_DESCRIPTION.to_string()))?;
        Ok::<_, AppError>(context.explain(&text, &job_description))
    })
    .await??;

    debug!(keywords = matching_keywords.len(), "Explained match");
    Ok(Json(ExplainResponse { matching_keywords }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub location: Option<String>,
    pub page: Option<i64>,
}

/// GET /search-jobs
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResults>, AppError> {
    let Query(params) =
        params.map_err(|e| AppError::Validation(format!("Invalid search parameters: {e}")))?;
    let page = params.page.unwrap_or(1);
    let config = state.config.search;
    let context = state.context.clone();

    let results = run_blocking("search-jobs", move || {
        context.search(
            params.query.as_deref(),
            params.location.as_deref(),
            page,
            config,
        )
    })
    .await?
    .map_err(|e| match e {
        SearchError::MissingCriteria => {
            AppError::Validation("Provide a 'query' or a 'location' to search".to_string())
        }
    })?;

    debug!(
        page,
        total = results.total_results,
        returned = results.results.len(),
        "Searched jobs"
    );
    Ok(Json(results))
}

use std::sync::Arc;

use crate::config::Config;
use crate::corpus::MatchContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; shared by every request without locking.
    pub context: Arc<MatchContext>,
    pub config: Config,
}

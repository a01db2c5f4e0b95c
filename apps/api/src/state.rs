use std::sync::Arc;

use crate::config::Config;
use crate::optimization::pipeline::Optimizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Keyword store, feedback ledger and completion client wired into one pipeline.
    pub optimizer: Arc<Optimizer>,
    pub config: Arc<Config>,
}

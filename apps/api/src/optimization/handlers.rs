use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::error;

use crate::errors::AppError;
use crate::models::optimization_log::NewLogEntry;
use crate::optimization::pipeline::Optimization;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub text: Option<String>,
}

/// POST /optimize, POST /api/optimize
///
/// Rewrites the text around the current ranked keywords and returns the
/// highlighted result with its target and achieved SEO scores.
pub async fn handle_optimize(
    State(state): State<AppState>,
    body: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<Optimization>, AppError> {
    let Json(request) = body?;
    let text = request.text.unwrap_or_default();

    // The pipeline logs its own outcomes; anything that escapes it unexpectedly
    // still gets a failure entry.
    let optimizer = state.optimizer.clone();
    let run_text = text.clone();
    let outcome = tokio::spawn(async move { optimizer.optimize(&run_text).await }).await;

    match outcome {
        Ok(result) => result.map(Json),
        Err(join_error) => {
            error!("Optimization task failed: {join_error}");
            state
                .optimizer
                .ledger()
                .record(NewLogEntry::failed(&[], &text))
                .await;
            Err(AppError::Internal(anyhow::anyhow!(
                "Optimization failed unexpectedly"
            )))
        }
    }
}

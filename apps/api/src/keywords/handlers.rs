use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::keyword::{KeywordPool, KeywordRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PoolListResponse {
    pub pool: KeywordPool,
    pub keywords: Vec<KeywordRecord>,
}

/// GET /api/keywords/:pool
///
/// Returns every record of one pool, ranked and un-split. Unlike the
/// optimizer's view, no cap or topic filter applies.
pub async fn handle_list_pool(
    State(state): State<AppState>,
    Path(pool): Path<String>,
) -> Result<Json<PoolListResponse>, AppError> {
    let pool: KeywordPool = pool.parse().map_err(AppError::Validation)?;

    let keywords = state.optimizer.keywords().list_pool(pool).await?;
    debug!("Listed {} records from pool {}", keywords.len(), pool.as_str());

    Ok(Json(PoolListResponse { pool, keywords }))
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers::handle_feedback;
use crate::keywords::handlers::handle_list_pool;
use crate::optimization::handlers::handle_optimize;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Optimization API, served both bare and under /api
        .route("/optimize", post(handle_optimize))
        .route("/api/optimize", post(handle_optimize))
        .route("/feedback", post(handle_feedback))
        .route("/api/feedback", post(handle_feedback))
        // Keyword pools
        .route("/api/keywords/:pool", get(handle_list_pool))
        .with_state(state)
}

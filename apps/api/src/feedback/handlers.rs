use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: String,
}

/// POST /feedback, POST /api/feedback
///
/// Marks the exact text as rejected so it is refused by /optimize from now on.
pub async fn handle_feedback(
    State(state): State<AppState>,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let Json(request) = body?;
    let text = request.text.unwrap_or_default();
    state.optimizer.reject(&text).await?;

    Ok(Json(FeedbackResponse {
        message: "Feedback received. We will not optimize this content again.".to_string(),
    }))
}

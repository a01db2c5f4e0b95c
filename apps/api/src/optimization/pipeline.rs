//! The optimization pipeline.
//!
//! reject-check → keyword fetch → prompt + completion → highlight → score → log
//!
//! Each step runs once per request. The completion call is the only step
//! allowed to fail softly: on error or timeout the original text is used.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::feedback::ledger::FeedbackLedger;
use crate::keywords::store::KeywordStore;
use crate::llm_client::{CompletionService, LlmError};
use crate::models::optimization_log::NewLogEntry;
use crate::optimization::highlighter::highlight;
use crate::optimization::prompts::{build_rewrite_prompt, clean_completion, REWRITE_SYSTEM};
use crate::optimization::scoring::{score, DensityPolicy};

const MISSING_TEXT: &str = "No content provided";

/// Response payload of a successful optimization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    pub optimized_text: String,
    pub highlighted_keywords: Vec<String>,
    pub target_seo_score: u32,
    pub current_seo_score: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub completion_timeout: Duration,
    pub density: DensityPolicy,
}

#[derive(Clone)]
pub struct Optimizer {
    keywords: KeywordStore,
    ledger: FeedbackLedger,
    completion: Arc<dyn CompletionService>,
    settings: PipelineSettings,
}

impl Optimizer {
    pub fn new(
        keywords: KeywordStore,
        ledger: FeedbackLedger,
        completion: Arc<dyn CompletionService>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            keywords,
            ledger,
            completion,
            settings,
        }
    }

    pub fn keywords(&self) -> &KeywordStore {
        &self.keywords
    }

    pub fn ledger(&self) -> &FeedbackLedger {
        &self.ledger
    }

    /// Runs the full pipeline for `text`.
    ///
    /// Refused texts return before any store read or completion call. Blank
    /// includes whitespace-only text, not just the empty string. Every other
    /// terminal outcome is logged.
    pub async fn optimize(&self, text: &str) -> Result<Optimization, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(MISSING_TEXT.to_string()));
        }

        if self.ledger.was_rejected(text).await {
            info!("Refusing to optimize previously rejected text");
            return Err(AppError::Rejected);
        }

        let keywords = self.keywords.fetch().await;
        if keywords.is_empty() {
            self.ledger.record(NewLogEntry::failed(&[], text)).await;
            return Err(AppError::NoKeywords);
        }

        let rewritten = self.rewrite(text, &keywords).await;
        let optimized_text = highlight(&rewritten, &keywords);
        let scores = score(text, &optimized_text, &keywords, &self.settings.density);

        info!(
            "Optimized text: target_score={} current_score={}",
            scores.target_score, scores.current_score
        );
        self.ledger
            .record(NewLogEntry::succeeded(&keywords, text))
            .await;

        Ok(Optimization {
            optimized_text,
            highlighted_keywords: keywords,
            target_seo_score: scores.target_score,
            current_seo_score: scores.current_score,
        })
    }

    /// Records that the user does not want `text` optimized again. Blank
    /// (including whitespace-only) text is a validation error.
    pub async fn reject(&self, text: &str) -> Result<(), AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(MISSING_TEXT.to_string()));
        }
        self.ledger.record(NewLogEntry::rejected(text)).await;
        Ok(())
    }

    /// Asks the completion service for a keyword-rich rewrite, falling back
    /// to the original text on any failure.
    async fn rewrite(&self, text: &str, keywords: &[String]) -> String {
        let prompt = build_rewrite_prompt(text, keywords);
        let timeout = self.settings.completion_timeout;

        let result = match tokio::time::timeout(
            timeout,
            self.completion.complete(&prompt, REWRITE_SYSTEM),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(timeout)),
        };

        match result.map(|rewritten| clean_completion(&rewritten)) {
            Ok(rewritten) if !rewritten.is_empty() => rewritten,
            Ok(_) => {
                warn!("Completion returned no usable text; using original text");
                text.to_string()
            }
            Err(e) => {
                warn!("Keyword insertion failed, using original text: {e}");
                text.to_string()
            }
        }
    }
}

//! FeedbackLedger: append-only record of every optimization outcome.
//!
//! The ledger doubles as the rejection index: a text the user rejected
//! (`feedback = true`) is never optimized again. Lookups are exact string
//! matches; any whitespace or casing difference bypasses the block.
//!
//! Neither operation fails outward. Storage errors are logged and the
//! ledger answers as if nothing were recorded.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::db::StoreError;
use crate::models::optimization_log::NewLogEntry;

/// Storage behind the ledger. `append` must be a single atomic insert.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    async fn append(&self, entry: &NewLogEntry) -> Result<(), StoreError>;

    /// True iff an entry with exactly `text` and `feedback = true` exists.
    async fn has_rejection(&self, text: &str) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct FeedbackLedger {
    backend: Arc<dyn LedgerBackend>,
}

impl FeedbackLedger {
    pub fn new(backend: Arc<dyn LedgerBackend>) -> Self {
        Self { backend }
    }

    pub async fn record(&self, entry: NewLogEntry) {
        match self.backend.append(&entry).await {
            Ok(()) => info!(
                "Logged optimization outcome: success={} feedback={} keywords={}",
                entry.success,
                entry.feedback,
                entry.keywords.len()
            ),
            Err(e) => error!("Error logging optimization outcome: {e}"),
        }
    }

    pub async fn was_rejected(&self, text: &str) -> bool {
        self.backend.has_rejection(text).await.unwrap_or_else(|e| {
            error!("Error checking for previous rejection: {e}");
            false
        })
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::db::StoreError;
use crate::feedback::ledger::LedgerBackend;
use crate::models::optimization_log::{NewLogEntry, OptimizationLogRow};

/// `optimization_logs` table. Rows are only ever inserted.
#[derive(Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerBackend for PgLedger {
    async fn append(&self, entry: &NewLogEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO optimization_logs (keywords, text, success, feedback, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&entry.keywords)
        .bind(&entry.text)
        .bind(entry.success)
        .bind(entry.feedback)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn has_rejection(&self, text: &str) -> Result<bool, StoreError> {
        let rejection: Option<OptimizationLogRow> = sqlx::query_as(
            r#"
            SELECT * FROM optimization_logs
            WHERE text = $1 AND feedback = TRUE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &rejection {
            debug!("Text rejected by log entry {} at {}", row.id, row.created_at);
        }
        Ok(rejection.is_some())
    }
}

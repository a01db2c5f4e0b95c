use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;

/// Failure talking to the backing store.
///
/// The optimizer path never surfaces it: the keyword store and the feedback
/// ledger log it and degrade to an empty or negative answer. Only the pool
/// listing endpoint returns it, as a database error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("invalid keyword filter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Creates the shared PostgreSQL pool for the keyword pools and the optimization log.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to keyword store...");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    info!("Keyword store pool established (max {MAX_CONNECTIONS} connections)");
    Ok(pool)
}

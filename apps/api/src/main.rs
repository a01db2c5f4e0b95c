mod config;
mod db;
mod errors;
mod feedback;
mod keywords;
mod llm_client;
mod models;
mod optimization;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::feedback::ledger::FeedbackLedger;
use crate::feedback::postgres::PgLedger;
use crate::keywords::postgres::PgKeywordRepository;
use crate::keywords::store::KeywordStore;
use crate::llm_client::LlmClient;
use crate::optimization::pipeline::{Optimizer, PipelineSettings};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SEO optimizer v{}", env!("CARGO_PKG_VERSION"));

    // Keyword pools and the optimization log share one pool
    let db = create_pool(&config.database_url).await?;

    let keywords = KeywordStore::new(
        Arc::new(PgKeywordRepository::new(db.clone())),
        config.pool_plan.clone(),
    )?;
    info!(
        "Keyword pools: primary topic {:?}, caps {}/{}/{}",
        config.pool_plan.primary_topic,
        config.pool_plan.primary_cap,
        config.pool_plan.secondary_cap,
        config.pool_plan.long_tail_cap
    );

    let ledger = FeedbackLedger::new(Arc::new(PgLedger::new(db)));

    let completion_timeout = Duration::from_secs(config.completion_timeout_secs);
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_model.clone(),
        completion_timeout,
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm.model(),
        config.completion_timeout_secs
    );

    let optimizer = Optimizer::new(
        keywords,
        ledger,
        Arc::new(llm),
        PipelineSettings {
            completion_timeout,
            density: config.density,
        },
    );

    let state = AppState {
        optimizer: Arc::new(optimizer),
        config: Arc::new(config.clone()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

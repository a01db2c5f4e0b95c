use std::str::FromStr;

use anyhow::{Context, Result};

use crate::keywords::store::PoolPlan;
use crate::optimization::scoring::DensityPolicy;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PRIMARY_TOPIC: &str = "apprenticeships";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub completion_timeout_secs: u64,
    pub pool_plan: PoolPlan,
    pub density: DensityPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        // An explicitly empty pattern disables the primary/secondary split.
        // The pattern runs as a Postgres POSIX regex (`~`); startup only checks
        // it against the `regex` crate, so keep it to the syntax both accept
        // (literals, alternation, classes, anchors).
        let primary_topic = match lookup("PRIMARY_TOPIC_PATTERN") {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(p),
            None => Some(DEFAULT_PRIMARY_TOPIC.to_string()),
        };

        let defaults = PoolPlan::default();
        let pool_plan = PoolPlan {
            primary_topic,
            primary_cap: parse_or(&lookup, "PRIMARY_POOL_CAP", defaults.primary_cap)?,
            secondary_cap: parse_or(&lookup, "SECONDARY_POOL_CAP", defaults.secondary_cap)?,
            long_tail_cap: parse_or(&lookup, "LONG_TAIL_POOL_CAP", defaults.long_tail_cap)?,
        };

        let density_defaults = DensityPolicy::default();
        let density = DensityPolicy {
            average: parse_or(&lookup, "TARGET_DENSITY_AVG", density_defaults.average)?,
            ceiling: parse_or(&lookup, "TARGET_DENSITY_MAX", density_defaults.ceiling)?,
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            llm_model: lookup("LLM_MODEL")
                .unwrap_or_else(|| crate::llm_client::DEFAULT_MODEL.to_string()),
            completion_timeout_secs: parse_or(
                &lookup,
                "COMPLETION_TIMEOUT_SECS",
                DEFAULT_COMPLETION_TIMEOUT_SECS,
            )?,
            pool_plan,
            density,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

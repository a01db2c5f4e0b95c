//! In-memory fakes for the store, ledger and completion seams, shared by the
//! unit tests of every module.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::config::Config;
use crate::db::StoreError;
use crate::feedback::ledger::{FeedbackLedger, LedgerBackend};
use crate::keywords::store::{rank_records, KeywordRepository, KeywordStore, PoolFilter, PoolPlan};
use crate::llm_client::{CompletionService, LlmError};
use crate::models::keyword::{KeywordPool, KeywordRecord};
use crate::models::optimization_log::NewLogEntry;
use crate::optimization::pipeline::{Optimizer, PipelineSettings};
use crate::optimization::scoring::DensityPolicy;
use crate::state::AppState;

pub fn record(keyword: &str, search_volume: i64, seo_difficulty: f64) -> KeywordRecord {
    KeywordRecord {
        keyword: keyword.to_string(),
        search_volume,
        seo_difficulty,
    }
}

fn store_failure() -> StoreError {
    StoreError::Query(sqlx::Error::PoolTimedOut)
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword pools
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FetchCounter(Arc<AtomicUsize>);

impl FetchCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Pools held in memory; filtering and ranking mirror the Postgres queries.
#[derive(Default)]
pub struct FakeKeywordRepository {
    pools: HashMap<KeywordPool, Vec<KeywordRecord>>,
    fail: bool,
    fetches: FetchCounter,
}

impl FakeKeywordRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_pool(mut self, pool: KeywordPool, records: Vec<KeywordRecord>) -> Self {
        self.pools.insert(pool, records);
        self
    }

    pub fn fetch_counter(&self) -> FetchCounter {
        self.fetches.clone()
    }
}

#[async_trait]
impl KeywordRepository for FakeKeywordRepository {
    async fn ranked(
        &self,
        pool: KeywordPool,
        filter: &PoolFilter,
        limit: usize,
    ) -> Result<Vec<KeywordRecord>, StoreError> {
        self.fetches.0.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(store_failure());
        }

        let keep: Box<dyn Fn(&KeywordRecord) -> bool> = match filter {
            PoolFilter::All => Box::new(|_| true),
            PoolFilter::Matching(pattern) => {
                let re = Regex::new(pattern)?;
                Box::new(move |r| re.is_match(&r.keyword))
            }
            PoolFilter::NotMatching(pattern) => {
                let re = Regex::new(pattern)?;
                Box::new(move |r| !re.is_match(&r.keyword))
            }
        };

        let mut records: Vec<KeywordRecord> = self
            .pools
            .get(&pool)
            .map(|records| records.iter().filter(|r| keep(r)).cloned().collect())
            .unwrap_or_default();
        rank_records(&mut records, limit);
        Ok(records)
    }

    async fn all(&self, pool: KeywordPool) -> Result<Vec<KeywordRecord>, StoreError> {
        if self.fail {
            return Err(store_failure());
        }
        Ok(self.pools.get(&pool).cloned().unwrap_or_default())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ledger
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<NewLogEntry>>,
    fail: bool,
}

impl MemoryLedger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<NewLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerBackend for MemoryLedger {
    async fn append(&self, entry: &NewLogEntry) -> Result<(), StoreError> {
        if self.fail {
            return Err(store_failure());
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn has_rejection(&self, text: &str) -> Result<bool, StoreError> {
        if self.fail {
            return Err(store_failure());
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.feedback && e.text == text))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Completion
// ────────────────────────────────────────────────────────────────────────────

enum Reply {
    Text(String),
    Fail,
    Stall(Duration),
}

pub struct FakeCompletion {
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl FakeCompletion {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(Reply::Fail)
    }

    /// Sleeps for `delay` before answering, to exercise the pipeline deadline.
    pub fn stalling(delay: Duration) -> Self {
        Self::with(Reply::Stall(delay))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(LlmError::Api {
                status: 529,
                message: "Overloaded".to_string(),
            }),
            Reply::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("too late".to_string())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wiring
// ────────────────────────────────────────────────────────────────────────────

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/keywords_test".to_string(),
        anthropic_api_key: "sk-test".to_string(),
        llm_model: crate::llm_client::DEFAULT_MODEL.to_string(),
        completion_timeout_secs: 30,
        pool_plan: PoolPlan::default(),
        density: DensityPolicy::default(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn optimizer_with(
    repo: FakeKeywordRepository,
    ledger: Arc<MemoryLedger>,
    completion: Arc<FakeCompletion>,
) -> Optimizer {
    let config = test_config();
    let keywords = KeywordStore::new(Arc::new(repo), config.pool_plan.clone())
        .expect("default plan is valid");
    Optimizer::new(
        keywords,
        FeedbackLedger::new(ledger),
        completion,
        PipelineSettings {
            completion_timeout: Duration::from_secs(config.completion_timeout_secs),
            density: config.density,
        },
    )
}

pub fn app_state_with(
    repo: FakeKeywordRepository,
    ledger: Arc<MemoryLedger>,
    completion: Arc<FakeCompletion>,
) -> AppState {
    AppState {
        optimizer: Arc::new(optimizer_with(repo, ledger, completion)),
        config: Arc::new(test_config()),
    }
}

//! KeywordStore: ranked keyword retrieval across the three pools.
//!
//! Each pool is filtered, sorted by `(search_volume desc, seo_difficulty asc)`
//! and capped independently, then the pools are concatenated in the fixed
//! order primary → secondary → long-tail. Compound records such as
//! "apprenticeships in London" are split on the whole word "in" so every
//! phrase is a first-class keyword downstream.
//!
//! `fetch` never fails: a store error is logged and yields an empty list,
//! which the pipeline treats as "no keywords".

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, error, info};

use crate::db::StoreError;
use crate::models::keyword::{KeywordPool, KeywordRecord};

/// Which records of a pool are eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolFilter {
    All,
    /// Keyword matches the pattern.
    Matching(String),
    /// Keyword does not match the pattern. Exact complement of `Matching`.
    NotMatching(String),
}

/// Per-pool caps and the primary-topic predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolPlan {
    /// Pattern separating primary-topic keywords from secondary ones.
    /// `None` leaves both pools unfiltered.
    pub primary_topic: Option<String>,
    pub primary_cap: usize,
    pub secondary_cap: usize,
    pub long_tail_cap: usize,
}

impl Default for PoolPlan {
    fn default() -> Self {
        Self {
            primary_topic: Some("apprenticeships".to_string()),
            primary_cap: 5,
            secondary_cap: 5,
            long_tail_cap: 3,
        }
    }
}

impl PoolPlan {
    pub fn filter_for(&self, pool: KeywordPool) -> PoolFilter {
        match (pool, &self.primary_topic) {
            (KeywordPool::Primary, Some(topic)) => PoolFilter::Matching(topic.clone()),
            (KeywordPool::Secondary, Some(topic)) => PoolFilter::NotMatching(topic.clone()),
            _ => PoolFilter::All,
        }
    }

    pub fn cap_for(&self, pool: KeywordPool) -> usize {
        match pool {
            KeywordPool::Primary => self.primary_cap,
            KeywordPool::Secondary => self.secondary_cap,
            KeywordPool::LongTail => self.long_tail_cap,
        }
    }
}

/// Backing store for the keyword pools.
///
/// Implementations return records ranked (and limited, for `ranked`); the
/// store re-ranks the result so ordering holds for any backend.
#[async_trait]
pub trait KeywordRepository: Send + Sync {
    async fn ranked(
        &self,
        pool: KeywordPool,
        filter: &PoolFilter,
        limit: usize,
    ) -> Result<Vec<KeywordRecord>, StoreError>;

    /// Every record of the pool, with no topic filter or limit.
    async fn all(&self, pool: KeywordPool) -> Result<Vec<KeywordRecord>, StoreError>;
}

#[derive(Clone)]
pub struct KeywordStore {
    repo: Arc<dyn KeywordRepository>,
    plan: PoolPlan,
}

impl KeywordStore {
    /// Fails only if the primary-topic pattern is not a valid regex.
    ///
    /// The pattern is checked with the `regex` crate but evaluated by the
    /// backend (Postgres `~`, POSIX ARE). Constructs outside the shared subset,
    /// such as lookaround or `\d` inside brackets, can pass here and still fail
    /// at query time, in which case `fetch` logs the error and returns nothing.
    pub fn new(repo: Arc<dyn KeywordRepository>, plan: PoolPlan) -> Result<Self, StoreError> {
        if let Some(topic) = &plan.primary_topic {
            Regex::new(topic)?;
        }
        Ok(Self { repo, plan })
    }

    /// Returns the flat, priority-ordered keyword list. Empty on any store failure.
    pub async fn fetch(&self) -> Vec<String> {
        match self.try_fetch().await {
            Ok(keywords) => {
                if keywords.is_empty() {
                    info!("No keywords found in the keyword store");
                } else {
                    info!("Fetched {} keywords from store", keywords.len());
                    debug!("Keywords: {:?}", keywords);
                }
                keywords
            }
            Err(e) => {
                error!("Error fetching keywords from store: {e}");
                Vec::new()
            }
        }
    }

    /// Every record of a pool, un-split and ranked. Neither the topic filter
    /// nor the pool cap applies.
    pub async fn list_pool(&self, pool: KeywordPool) -> Result<Vec<KeywordRecord>, StoreError> {
        let mut records = self.repo.all(pool).await?;
        sort_ranked(&mut records);
        Ok(records)
    }

    /// The filtered, capped slice of a pool that feeds `fetch`.
    pub async fn ranked_pool(&self, pool: KeywordPool) -> Result<Vec<KeywordRecord>, StoreError> {
        let cap = self.plan.cap_for(pool);
        let filter = self.plan.filter_for(pool);
        let mut records = self.repo.ranked(pool, &filter, cap).await?;
        rank_records(&mut records, cap);
        Ok(records)
    }

    async fn try_fetch(&self) -> Result<Vec<String>, StoreError> {
        let mut records = Vec::new();
        for pool in KeywordPool::ALL {
            records.extend(self.ranked_pool(pool).await?);
        }
        Ok(flatten_keywords(&records))
    }
}

/// Sorts by search volume descending, then difficulty ascending, and truncates.
pub fn rank_records(records: &mut Vec<KeywordRecord>, cap: usize) {
    sort_ranked(records);
    records.truncate(cap);
}

/// Search volume descending, then difficulty ascending.
pub fn sort_ranked(records: &mut [KeywordRecord]) {
    records.sort_by(|a, b| {
        b.search_volume
            .cmp(&a.search_volume)
            .then_with(|| {
                a.seo_difficulty
                    .partial_cmp(&b.seo_difficulty)
                    .unwrap_or(Ordering::Equal)
            })
    });
}

fn in_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"(?i)\bin\b").expect("valid separator regex"))
}

/// Splits a record on the whole word "in" (any case). Phrases are trimmed and
/// empty pieces dropped, so "in London" yields just "London".
pub fn split_compound_keyword(keyword: &str) -> Vec<String> {
    in_separator()
        .split(keyword)
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits every record and keeps the first occurrence of each resulting keyword.
pub fn flatten_keywords(records: &[KeywordRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|record| split_compound_keyword(&record.keyword))
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}

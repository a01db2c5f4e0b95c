use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::StoreError;
use crate::keywords::store::{KeywordRepository, PoolFilter};
use crate::models::keyword::{KeywordPool, KeywordRecord};

/// Keyword pools stored as one Postgres table per pool.
#[derive(Clone)]
pub struct PgKeywordRepository {
    pool: PgPool,
}

impl PgKeywordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeywordRepository for PgKeywordRepository {
    async fn ranked(
        &self,
        pool: KeywordPool,
        filter: &PoolFilter,
        limit: usize,
    ) -> Result<Vec<KeywordRecord>, StoreError> {
        let sql = ranked_query(pool, filter);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let query = sqlx::query_as::<_, KeywordRecord>(&sql);
        let query = match filter {
            PoolFilter::All => query.bind(limit),
            PoolFilter::Matching(pattern) | PoolFilter::NotMatching(pattern) => {
                query.bind(pattern).bind(limit)
            }
        };

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn all(&self, pool: KeywordPool) -> Result<Vec<KeywordRecord>, StoreError> {
        let sql = list_query(pool);
        Ok(sqlx::query_as::<_, KeywordRecord>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }
}

const RANK_ORDER: &str = "ORDER BY search_volume DESC, seo_difficulty ASC";

/// Builds the ranked-pool query. Table names come from `KeywordPool`, never
/// from user input; the pattern and limit are bound parameters.
fn ranked_query(pool: KeywordPool, filter: &PoolFilter) -> String {
    let (predicate, limit_param) = match filter {
        PoolFilter::All => ("", "$1"),
        PoolFilter::Matching(_) => ("WHERE keyword ~ $1 ", "$2"),
        PoolFilter::NotMatching(_) => ("WHERE NOT (keyword ~ $1) ", "$2"),
    };

    format!(
        "SELECT keyword, search_volume, seo_difficulty FROM {} {}{} LIMIT {}",
        pool.table(),
        predicate,
        RANK_ORDER,
        limit_param
    )
}

/// Whole-pool listing query: no predicate, no limit.
fn list_query(pool: KeywordPool) -> String {
    format!(
        "SELECT keyword, search_volume, seo_difficulty FROM {} {}",
        pool.table(),
        RANK_ORDER
    )
}

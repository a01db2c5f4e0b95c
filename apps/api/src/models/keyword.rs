use std::str::FromStr;

use serde::Serialize;
use sqlx::FromRow;

/// One ranked keyword row as stored in a pool table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    pub keyword: String,
    pub search_volume: i64,
    pub seo_difficulty: f64,
}

/// The three keyword pools, in the order they are presented downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeywordPool {
    Primary,
    Secondary,
    LongTail,
}

impl KeywordPool {
    pub const ALL: [KeywordPool; 3] = [
        KeywordPool::Primary,
        KeywordPool::Secondary,
        KeywordPool::LongTail,
    ];

    pub fn table(self) -> &'static str {
        match self {
            KeywordPool::Primary => "keywords_primary",
            KeywordPool::Secondary => "keywords_secondary",
            KeywordPool::LongTail => "keywords_long_tail",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeywordPool::Primary => "primary",
            KeywordPool::Secondary => "secondary",
            KeywordPool::LongTail => "long-tail",
        }
    }
}

impl FromStr for KeywordPool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(KeywordPool::Primary),
            "secondary" => Ok(KeywordPool::Secondary),
            "long-tail" | "long_tail" | "longtail" => Ok(KeywordPool::LongTail),
            other => Err(format!(
                "Unknown keyword pool '{other}' (expected primary, secondary or long-tail)"
            )),
        }
    }
}

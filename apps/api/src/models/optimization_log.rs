use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the append-only `optimization_logs` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OptimizationLogRow {
    pub id: Uuid,
    pub keywords: Vec<String>,
    pub text: String,
    pub success: bool,
    pub feedback: bool,
    pub created_at: DateTime<Utc>,
}

/// An entry about to be appended. The timestamp is captured at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub keywords: Vec<String>,
    pub text: String,
    pub success: bool,
    /// True when the user rejected this exact original text.
    pub feedback: bool,
    pub timestamp: DateTime<Utc>,
}

impl NewLogEntry {
    pub fn new(keywords: Vec<String>, text: &str, success: bool, feedback: bool) -> Self {
        Self {
            keywords,
            text: text.to_string(),
            success,
            feedback,
            timestamp: Utc::now(),
        }
    }

    pub fn succeeded(keywords: &[String], text: &str) -> Self {
        Self::new(keywords.to_vec(), text, true, false)
    }

    pub fn failed(keywords: &[String], text: &str) -> Self {
        Self::new(keywords.to_vec(), text, false, false)
    }

    pub fn rejected(text: &str) -> Self {
        Self::new(Vec::new(), text, false, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_entry_carries_no_keywords() {
        let entry = NewLogEntry::rejected("Learn skills fast");
        assert!(entry.keywords.is_empty());
        assert!(entry.feedback);
        assert!(!entry.success);
        assert_eq!(entry.text, "Learn skills fast");
    }

    #[test]
    fn test_success_entry_is_not_feedback() {
        let entry = NewLogEntry::succeeded(&["skills".to_string()], "Learn skills fast");
        assert!(entry.success);
        assert!(!entry.feedback);
        assert_eq!(entry.keywords, vec!["skills"]);
    }
}

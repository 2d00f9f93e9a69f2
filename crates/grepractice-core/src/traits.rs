//! Core trait definitions for question sources.
//!
//! The HTTP-backed and mock implementations live in `grepractice-client`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Paging parameters for a question fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionQuery {
    /// Maximum number of records to return (the service defaults to 10).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of records to skip.
    #[serde(default)]
    pub skip: Option<u32>,
}

impl QuestionQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            skip: None,
        }
    }

    /// Query-string suffix for `/questions`, including the leading `?`.
    pub fn to_query_string(&self) -> String {
        let params: Vec<String> = [("limit", self.limit), ("skip", self.skip)]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| format!("{k}={v}")))
            .collect();
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Something that yields raw question records.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch raw, un-normalized question records.
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Value>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string() {
        assert_eq!(QuestionQuery::default().to_query_string(), "");
        assert_eq!(QuestionQuery::with_limit(5).to_query_string(), "?limit=5");
        let q = QuestionQuery {
            limit: Some(10),
            skip: Some(20),
        };
        assert_eq!(q.to_query_string(), "?limit=10&skip=20");
        let q = QuestionQuery {
            limit: None,
            skip: Some(3),
        };
        assert_eq!(q.to_query_string(), "?skip=3");
    }
}

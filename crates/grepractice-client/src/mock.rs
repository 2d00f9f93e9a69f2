//! Mock question source for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use grepractice_core::error::FetchError;
use grepractice_core::traits::{QuestionQuery, QuestionSource};

/// A question source that returns a canned result without any network.
pub struct MockQuestionSource {
    result: Result<Vec<Value>, FetchError>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last query received.
    last_query: Mutex<Option<QuestionQuery>>,
}

impl MockQuestionSource {
    /// Always return these raw records.
    pub fn with_records(records: Vec<Value>) -> Self {
        Self::with_result(Ok(records))
    }

    /// Always fail with this error.
    pub fn failing(error: FetchError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<Vec<Value>, FetchError>) -> Self {
        Self {
            result,
            call_count: AtomicU32::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last query made to this source.
    pub fn last_query(&self) -> Option<QuestionQuery> {
        *self.last_query.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl QuestionSource for MockQuestionSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Value>, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_query.lock().unwrap_or_else(|e| e.into_inner()) = Some(*query);
        self.result.clone()
    }
}

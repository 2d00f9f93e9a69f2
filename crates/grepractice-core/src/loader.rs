//! Question loading with fallback.
//!
//! A load fetches raw records once, normalizes them, and on any failure
//! substitutes the local fallback set while keeping the cause for display.
//! There are no automatic retries; reloading is the caller's decision.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::FetchError;
use crate::fallback::fallback_questions;
use crate::model::{CanonicalQuestion, DataQualityWarning};
use crate::normalize::normalize;
use crate::traits::{QuestionQuery, QuestionSource};

/// Where the loaded questions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionOrigin {
    Remote,
    Fallback,
}

/// The single result of a question load.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Questions to render. Never empty.
    pub questions: Vec<CanonicalQuestion>,
    /// Data-quality warnings from normalization.
    pub warnings: Vec<DataQualityWarning>,
    pub origin: QuestionOrigin,
    /// Why the fallback set is being shown, if it is.
    pub failure: Option<FetchError>,
    /// Wall-clock duration of the load.
    pub elapsed_ms: u64,
}

impl LoadOutcome {
    fn fallback(failure: FetchError, elapsed_ms: u64) -> Self {
        Self {
            questions: fallback_questions(),
            warnings: Vec::new(),
            origin: QuestionOrigin::Fallback,
            failure: Some(failure),
            elapsed_ms,
        }
    }

    /// Non-blocking banner text describing a failed load.
    pub fn banner(&self) -> Option<String> {
        self.failure.as_ref().map(|e| {
            format!("Could not load questions ({e}). Showing the built-in practice set; reload to try again.")
        })
    }
}

/// Fetch, normalize, and fall back. Always produces an outcome.
pub async fn load_questions(source: &dyn QuestionSource, query: &QuestionQuery) -> LoadOutcome {
    let start = Instant::now();

    let fetched = match source.fetch_questions(query).await {
        Ok(records) if records.is_empty() => Err(FetchError::EmptyResult),
        other => other,
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let outcome = match fetched {
        Ok(records) => {
            let normalized = normalize(&records);
            LoadOutcome {
                questions: normalized.questions,
                warnings: normalized.warnings,
                origin: QuestionOrigin::Remote,
                failure: None,
                elapsed_ms,
            }
        }
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "question load failed, using fallback set");
            LoadOutcome::fallback(e, elapsed_ms)
        }
    };

    tracing::debug!(
        source = source.name(),
        origin = ?outcome.origin,
        questions = outcome.questions.len(),
        elapsed_ms,
        "question load finished"
    );
    outcome
}

/// A load running in the background.
///
/// Dropping it abandons the load: the request runs to completion but its
/// result is discarded.
#[derive(Debug)]
pub struct PendingLoad {
    rx: oneshot::Receiver<LoadOutcome>,
}

impl PendingLoad {
    /// Wait for the outcome. A load task that dies without reporting is
    /// treated like an unreachable service.
    pub async fn wait(self) -> LoadOutcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => LoadOutcome::fallback(
                FetchError::NetworkUnavailable("load task ended without a result".into()),
                0,
            ),
        }
    }
}

/// Start a load on the tokio runtime.
pub fn spawn_load(source: Arc<dyn QuestionSource>, query: QuestionQuery) -> PendingLoad {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = load_questions(source.as_ref(), &query).await;
        if tx.send(outcome).is_err() {
            tracing::debug!(source = source.name(), "load abandoned, discarding result");
        }
    });
    PendingLoad { rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WarningKind;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct StubSource {
        result: Result<Vec<Value>, FetchError>,
        delay: Duration,
        completed: AtomicBool,
    }

    impl StubSource {
        fn new(result: Result<Vec<Value>, FetchError>) -> Self {
            Self {
                result,
                delay: Duration::ZERO,
                completed: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl QuestionSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_questions(&self, _query: &QuestionQuery) -> Result<Vec<Value>, FetchError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.completed.store(true, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn remote_records_are_normalized() {
        let source = StubSource::new(Ok(vec![
            json!({"id": "r1", "content": "1 + 1?", "options": ["1", "2"], "correct_answer": "2"}),
            json!({"id": "r2", "content": "2 + 2?", "options": ["4"], "correct_answer": "9"}),
        ]));
        let outcome = load_questions(&source, &QuestionQuery::default()).await;
        assert_eq!(outcome.origin, QuestionOrigin::Remote);
        assert!(outcome.failure.is_none());
        assert!(outcome.banner().is_none());
        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.questions[0].correct_option_id, "B");
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::UnmatchedCorrectAnswer);
    }

    #[tokio::test]
    async fn empty_result_uses_fallback() {
        let source = StubSource::new(Ok(vec![]));
        let outcome = load_questions(&source, &QuestionQuery::default()).await;
        assert_eq!(outcome.origin, QuestionOrigin::Fallback);
        assert_eq!(outcome.failure, Some(FetchError::EmptyResult));
        assert_eq!(outcome.questions, fallback_questions());
        assert!(outcome.banner().unwrap().contains("question bank is empty"));
    }

    #[tokio::test]
    async fn fetch_errors_use_fallback() {
        let source = StubSource::new(Err(FetchError::HttpError {
            status: 503,
            message: "MongoDB unavailable".into(),
        }));
        let outcome = load_questions(&source, &QuestionQuery::with_limit(3)).await;
        assert_eq!(outcome.origin, QuestionOrigin::Fallback);
        assert_eq!(outcome.failure.as_ref().and_then(FetchError::status), Some(503));
        assert!(!outcome.questions.is_empty());
    }

    #[tokio::test]
    async fn spawned_load_reports_outcome() {
        let source = Arc::new(StubSource::new(Err(FetchError::NetworkUnavailable(
            "connection refused".into(),
        ))));
        let outcome = spawn_load(source, QuestionQuery::default()).wait().await;
        assert_eq!(outcome.origin, QuestionOrigin::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_load_is_ignored() {
        let source = Arc::new(StubSource {
            result: Ok(vec![json!({"id": "late", "content": "late"})]),
            delay: Duration::from_secs(2),
            completed: AtomicBool::new(false),
        });
        let pending = spawn_load(source.clone(), QuestionQuery::default());
        drop(pending);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(source.completed.load(Ordering::SeqCst));
    }
}

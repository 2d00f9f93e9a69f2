//! HTTP question source backed by the GRE question service.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use grepractice_core::error::FetchError;
use grepractice_core::traits::{QuestionQuery, QuestionSource};

use crate::config::GrePracticeConfig;

/// Question source that talks to the REST service.
pub struct HttpQuestionSource {
    base_url: String,
    timeout_ms: u64,
    client: reqwest::Client,
}

/// Response of `GET /health-check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub database_status: Value,
}

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl HttpQuestionSource {
    pub fn new(config: &GrePracticeConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            timeout_ms: config.timeout_ms,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::NetworkUnavailable(format!(
                "request timed out after {}ms",
                self.timeout_ms
            ))
        } else if e.is_connect() {
            FetchError::NetworkUnavailable(format!(
                "question service not reachable at {}",
                self.base_url
            ))
        } else {
            FetchError::NetworkUnavailable(e.to_string())
        }
    }

    /// GET a path and return the body as JSON, mapping every failure.
    async fn get_json(&self, path_and_query: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| match b.detail {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .filter(|m| !m.is_empty())
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "request failed".to_string());
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                FetchError::DecodeError(e.to_string())
            }
        })
    }

    /// Ask the service whether its databases are reachable.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health_check(&self) -> Result<HealthStatus, FetchError> {
        let body = self.get_json("/health-check").await?;
        serde_json::from_value(body)
            .map_err(|e| FetchError::DecodeError(format!("unexpected health-check body: {e}")))
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Value>, FetchError> {
        let body = self
            .get_json(&format!("/questions{}", query.to_query_string()))
            .await?;

        match body {
            Value::Array(records) => {
                tracing::debug!(count = records.len(), "fetched question records");
                Ok(records)
            }
            other => Err(FetchError::DecodeError(format!(
                "expected a JSON array of questions, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

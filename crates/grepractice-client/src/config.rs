//! Client configuration.
//!
//! The service endpoint is an explicit value loaded once at process start and
//! passed to the client, never a global.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use grepractice_core::session::DEFAULT_TIME_LIMIT_SECS;

/// Top-level grepractice configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrePracticeConfig {
    /// Base URL of the question service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms", alias = "timeoutMs")]
    pub timeout_ms: u64,
    /// Questions requested per practice session.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Practice session length in seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8001".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_limit() -> u32 {
    10
}
fn default_time_limit() -> u64 {
    DEFAULT_TIME_LIMIT_SECS
}

impl Default for GrePracticeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            default_limit: default_limit(),
            time_limit_secs: default_time_limit(),
        }
    }
}

impl GrePracticeConfig {
    /// Endpoint without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            anyhow::bail!(
                "endpoint must start with http:// or https://, got '{}'",
                self.endpoint
            );
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("timeout_ms must be greater than zero");
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `grepractice.toml` in the current directory
/// 2. `~/.config/grepractice/config.toml`
///
/// Environment variable overrides: `GREPRACTICE_ENDPOINT`, `GREPRACTICE_TIMEOUT_MS`.
pub fn load_config() -> Result<GrePracticeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GrePracticeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("grepractice.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => GrePracticeConfig::default(),
    };

    if let Ok(endpoint) = std::env::var("GREPRACTICE_ENDPOINT") {
        config.endpoint = endpoint;
    }
    if let Ok(timeout) = std::env::var("GREPRACTICE_TIMEOUT_MS") {
        config.timeout_ms = timeout
            .parse()
            .with_context(|| format!("GREPRACTICE_TIMEOUT_MS is not a number: {timeout}"))?;
    }

    config.endpoint = resolve_env_vars(&config.endpoint);
    config.validate()?;

    tracing::debug!(
        path = ?config_path,
        endpoint = %config.endpoint,
        timeout_ms = config.timeout_ms,
        "loaded configuration"
    );
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<GrePracticeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<GrePracticeConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("grepractice"))
}

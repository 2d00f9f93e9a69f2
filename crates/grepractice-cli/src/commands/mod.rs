//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;

use grepractice_client::{load_config_from, GrePracticeConfig};

pub mod calc;
pub mod eval;
pub mod health;
pub mod init;
pub mod practice;
pub mod questions;

/// Load the config and apply a command-line endpoint override.
fn resolve_config(
    config_path: Option<PathBuf>,
    endpoint: Option<String>,
) -> Result<GrePracticeConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
        config.validate()?;
    }
    Ok(config)
}

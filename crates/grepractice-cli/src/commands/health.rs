//! The `grepractice health` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use grepractice_client::HttpQuestionSource;

pub async fn execute(endpoint: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::resolve_config(config_path, endpoint)?;
    let source = HttpQuestionSource::new(&config)?;

    let health = source
        .health_check()
        .await
        .with_context(|| format!("health check against {} failed", source.base_url()))?;

    println!("Service: {}", source.base_url());
    match &health.database_status {
        Value::Object(map) => {
            for (name, status) in map {
                println!("  {name}: {}", plain(status));
            }
        }
        other => println!("  database: {}", plain(other)),
    }

    Ok(())
}

fn plain(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

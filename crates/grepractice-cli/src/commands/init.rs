//! The `grepractice init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("grepractice.toml").exists() {
        println!("grepractice.toml already exists, skipping.");
    } else {
        std::fs::write("grepractice.toml", SAMPLE_CONFIG)?;
        println!("Created grepractice.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point `endpoint` at your question service");
    println!("  2. Run: grepractice health");
    println!("  3. Run: grepractice practice");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# grepractice configuration

# Base URL of the question service. ${VAR} references are expanded.
endpoint = "http://127.0.0.1:8001"

# Request timeout in milliseconds.
timeout_ms = 10000

# Questions requested per practice session.
default_limit = 10

# Practice session length in seconds.
time_limit_secs = 1200
"#;

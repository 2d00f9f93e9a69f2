//! grepractice CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "grepractice", version, about = "GRE math practice: calculator and quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an arithmetic expression
    Eval {
        /// Expression using digits, + - * / ( ) and .
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Press calculator keys and show the display
    Calc {
        /// Key labels: 0-9 . + - * / = C +/- sqrt MR MC M+
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        keys: Vec<String>,

        /// Print the display after every key
        #[arg(long)]
        trace: bool,
    },

    /// Fetch and list questions
    Questions {
        /// Number of questions to request
        #[arg(long)]
        limit: Option<u32>,

        /// Number of questions to skip
        #[arg(long)]
        skip: Option<u32>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Question service base URL (overrides config)
        #[arg(long)]
        endpoint: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Take a timed practice quiz
    Practice {
        /// Number of questions to request
        #[arg(long)]
        limit: Option<u32>,

        /// Question service base URL (overrides config)
        #[arg(long)]
        endpoint: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check the question service
    Health {
        /// Question service base URL (overrides config)
        #[arg(long)]
        endpoint: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("grepractice=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval { expression } => commands::eval::execute(expression),
        Commands::Calc { keys, trace } => commands::calc::execute(keys, trace),
        Commands::Questions {
            limit,
            skip,
            format,
            endpoint,
            config,
        } => commands::questions::execute(limit, skip, format, endpoint, config).await,
        Commands::Practice {
            limit,
            endpoint,
            config,
        } => commands::practice::execute(limit, endpoint, config).await,
        Commands::Health { endpoint, config } => commands::health::execute(endpoint, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

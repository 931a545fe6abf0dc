//! youthdesk CLI — the main entry point.
//!
//! Commands:
//! - `serve` — Start the HTTP API gateway
//! - `seed`  — Load policy records into the catalog from a JSON file
//! - `ask`   — Ask a single question from the terminal

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "youthdesk",
    about = "youthdesk — youth policy search and Q&A service",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load policy records from a JSON file into the catalog
    Seed {
        /// Path to a JSON array of policy records
        file: PathBuf,
    },

    /// Ask a single question from the terminal
    Ask {
        /// The question text
        question: String,

        /// Reuse an existing guest token to continue a conversation
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = youthdesk_config::AppConfig::load(&cli.config)
        .map_err(|e| format!("Failed to load config: {e}"))?;

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Seed { file } => commands::seed::run(config, &file).await?,
        Commands::Ask { question, token } => {
            commands::ask::run(config, &question, token.as_deref()).await?
        }
    }

    Ok(())
}

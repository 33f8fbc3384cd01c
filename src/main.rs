use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use walkin_client::cli::{handle_command, Cli};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(std::env::var("WALKIN_LOG_LEVEL").unwrap_or_else(|_| "info".into()))
    })?;

    // JSON to a file when asked, compact to stderr otherwise
    match std::env::var("WALKIN_LOG_FILE") {
        Ok(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(file)
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .with(filter)
                .try_init()?;
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .with(filter)
                .try_init()?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    handle_command(cli).await
}

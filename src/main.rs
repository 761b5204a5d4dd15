//! CLI entry point for the image fetcher.

use std::io;

use anyhow::Result;
use clap::Parser;
use imgfetch_core::{Fetcher, Shell};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    // Logs go to stderr; stdout belongs to the interactive prompts.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    debug!(?args, "CLI arguments parsed");

    let fetcher = Fetcher::from_config(args.fetch_config())?;
    let mut shell = Shell::new(fetcher, io::stdin().lock(), io::stdout());
    let summary = shell.run().await?;

    info!(
        attempted = summary.attempted(),
        succeeded = summary.succeeded(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "session finished"
    );

    Ok(())
}

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::{io, process::ExitCode};
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod models;
mod runner;
mod services;

use config::Args;
use services::storage_service::R2Store;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // --- Logging setup ---
    // stdout is reserved for the `--json` summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let json = args.json;

    let result = runner::run(
        args,
        config::env_lookup,
        R2Store::connect,
        Utc::now(),
    )
    .await;

    let summary = match result {
        Ok(summary) => summary,
        Err(err) if err.is_config() => {
            tracing::error!("Required parameter not found: {}", err);
            return Ok(ExitCode::from(err.exit_code()));
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        let rendered =
            serde_json::to_string_pretty(&summary).context("serializing run summary")?;
        println!("{}", rendered);
    }

    Ok(ExitCode::SUCCESS)
}

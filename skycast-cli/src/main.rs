//! Binary crate for the `skycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting

use std::process::ExitCode;

use clap::Parser;
use skycast_core::WeatherError;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

/// One line for the user; provider failures get their friendly wording.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<WeatherError>() {
        Some(weather) => weather.user_message(),
        None => err.to_string(),
    }
}

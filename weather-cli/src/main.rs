//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting
//! - Owning the log file and its subscriber

use clap::Parser;

mod cli;
mod logging;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(&logging::log_file_path()?, cmd.verbose)?;

    if let Err(err) = cmd.run().await {
        tracing::error!(error = %format!("{err:#}"), "command failed");
        cli::report_error(&err);
        std::process::exit(1);
    }

    Ok(())
}

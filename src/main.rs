use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use validate_markup::{Cli, ConfigManager, Output, ResultSet};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    match run_app(&cli).await {
        Ok(results) => {
            if results.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(2)
        }
    }
}

/// Diagnostics go to stderr so report output stays pipeable. RUST_LOG
/// controls the level; warnings only by default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_app(cli: &Cli) -> anyhow::Result<ResultSet> {
    cli.validate().map_err(anyhow::Error::msg)?;

    let config = ConfigManager::load_config(cli)
        .await
        .context("failed to load configuration")?;

    let output = Output::new(
        config.output.format.clone().into(),
        config.output.verbosity(),
    );

    let started = Instant::now();
    let results = validate_markup::run(&config)
        .await
        .context("validation run failed")?;
    let duration = started.elapsed();

    let formatted = output.format_results(&results, duration);
    if !formatted.is_empty() {
        print!("{formatted}");
    }

    Ok(results)
}

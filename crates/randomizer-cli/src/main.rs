//! Randomizer CLI entry point.

use std::process::ExitCode;

use randomizer_cli::command::{self, USAGE};
use randomizer_cli::config;
use randomizer_cli::error::{AppError, ErrorBody};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize tracing subscriber. Results go to stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            if matches!(err, AppError::Usage(_)) {
                eprintln!("{USAGE}");
            }
            match serde_json::to_string(&ErrorBody::from(&err)) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("{err}"),
            }
            ExitCode::from(err.exit_status())
        }
    }
}

fn run(args: &[String]) -> Result<String, AppError> {
    // Read configuration from environment.
    let config = config::from_env()?;
    tracing::info!(
        engine = ?config.engine,
        retry_budget = config.retry_budget,
        "randomizer configured"
    );

    command::execute(args, &config)
}

#![allow(non_snake_case)]

use std::env;
use std::process::ExitCode;

use checkoutBot::cli::{self, Cli};
use checkoutBot::config::DEFAULT_CONFIG_FILE;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let send_failure_is_fatal = cli::send_failure_is_fatal(args.command.as_ref());
    let config_path = env::var("CONFIG_FILE").unwrap_or(DEFAULT_CONFIG_FILE.to_string());
    let config = match cli::load_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "unable to load configuration");
            return ExitCode::FAILURE;
        }
    };

    match cli::cli(args, &config_path, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "run failed");
            if err.is_fatal() || send_failure_is_fatal {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

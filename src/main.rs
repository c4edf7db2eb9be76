//! Sluice - materialize secrets into config templates and Kubernetes objects.

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sluice::cli::output;
use sluice::cli::{execute, Cli};
use sluice::core::constants::LOG_ENV;
use sluice::error::{ConfigError, Error, SecretError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sluice=debug")
        } else {
            EnvFilter::new("sluice=warn")
        }
    });

    let log_file = match cli.log_file.as_deref() {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                output::error(&format!("cannot open log file {}: {}", path.display(), e));
                std::process::exit(1);
            }
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(log_file.map(|file| {
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
        }))
        .init();

    if let Err(e) = execute(cli.command, cli.config.as_deref()) {
        // Format error with suggestion if available
        let error_msg = e.to_string();
        let suggestion = match &e {
            Error::Config(ConfigError::NotFound(_)) => {
                Some("create sluice.toml or pass --config <path>")
            }
            Error::Config(ConfigError::NoTargets) => Some("run: sluice check"),
            Error::Config(ConfigError::UnsupportedBackend(_)) => {
                Some("set [store] backend = \"local\" or rebuild with the aws feature")
            }
            Error::Secret(SecretError::Fetch { .. }) => {
                Some("check the secret name, region and credentials profile")
            }
            Error::RunFailed(_) => Some("rerun with --verbose for details"),
            _ => None,
        };

        output::error(&error_msg);
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

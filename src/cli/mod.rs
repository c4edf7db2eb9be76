//! Command-line interface.

pub mod apply;
pub mod check;
pub mod completions;
pub mod get;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::core::config::Config;

/// Sluice - materialize secrets into config templates and cluster objects.
#[derive(Parser)]
#[command(
    name = "sluice",
    about = "Materialize secrets into config templates and Kubernetes objects",
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short = 'f', long = "config", global = true, env = "SLUICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also append logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Fetch secrets for every environment and apply them to all targets
    Apply {
        /// Only process one kind of target
        #[arg(long, value_enum)]
        only: Option<Surface>,
        /// Render and report without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a secret, or one key of it
    Get {
        /// Secret identifier (name or ARN)
        identifier: String,
        /// Print only this key of the JSON payload
        #[arg(short, long)]
        key: Option<String>,
        /// Store region
        #[arg(short, long)]
        region: Option<String>,
        /// Credentials profile
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Validate the configuration and list derived targets
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Target surfaces selectable with `--only`.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Surface {
    File,
    Cluster,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command, config: Option<&Path>) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Apply {
            only,
            dry_run,
            json,
        } => apply::execute(config_path(config).as_path(), only, dry_run, json),
        Get {
            identifier,
            key,
            region,
            profile,
        } => get::execute(
            config,
            &identifier,
            key.as_deref(),
            region.as_deref(),
            profile.as_deref(),
        ),
        Check => check::execute(config_path(config).as_path()),
        Completions { shell } => completions::execute(shell),
    }
}

fn config_path(config: Option<&Path>) -> PathBuf {
    config
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path)
}

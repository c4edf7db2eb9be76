//! Apply command - run the driver over every configured environment.

use std::path::Path;

use tracing::debug;

use crate::cli::output;
use crate::cli::Surface;
use crate::core::cluster::Kubectl;
use crate::core::config::Config;
use crate::core::driver::{Driver, Only, Options};
use crate::core::report::{EnvironmentReport, FetchOutcome, Outcome, RunReport};
use crate::core::store;
use crate::error::{ConfigError, Error, Result};

/// Fetch secrets and apply them to every target.
///
/// Exits non-zero when any fetch or target failed; skipped targets do not
/// count as failures.
pub fn execute(config_path: &Path, only: Option<Surface>, dry_run: bool, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    if !config.has_targets() {
        return Err(ConfigError::NoTargets.into());
    }

    let store = store::from_config(&config)?;
    let kubectl = config.cluster.as_ref().map(Kubectl::new);

    let options = Options {
        dry_run,
        only: only.map(|surface| match surface {
            Surface::File => Only::File,
            Surface::Cluster => Only::Cluster,
        }),
    };
    debug!(?options, "apply options");

    let mut driver = Driver::new(&config, store.as_ref()).with_options(options);
    if let Some(client) = &kubectl {
        driver = driver.with_cluster(client);
    }
    let report = driver.run();

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        println!("{}", rendered);
    } else {
        print_report(&report, dry_run);
    }

    let (_, _, failed) = report.tally();
    if failed > 0 {
        return Err(Error::RunFailed(failed));
    }
    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    for env in &report.environments {
        print_environment(env);
    }

    let (done, skipped, failed) = report.tally();
    println!();
    let summary = format!(
        "{} {}, {} skipped, {} failed",
        done,
        if dry_run { "previewed" } else { "applied" },
        skipped,
        failed
    );
    if failed == 0 {
        output::success(&summary);
    } else {
        output::warn(&summary);
    }
}

fn print_environment(env: &EnvironmentReport) {
    output::section(&env.environment);
    output::kv("secret:", &env.identifier);

    match &env.fetch {
        FetchOutcome::Fetched { keys } => output::kv("keys:", keys),
        FetchOutcome::Failed { reason } => {
            output::error(reason);
            return;
        }
    }

    if env.targets.is_empty() {
        output::dimmed("  no targets selected");
    }

    for target in &env.targets {
        let line = format!("{} {}", target.kind, output::path(&target.location));
        match &target.outcome {
            Outcome::Done { detail } => output::success(&format!("{}: {}", line, detail)),
            Outcome::Skipped { reason } => output::warn(&format!("{}: {}", line, reason)),
            Outcome::Failed { reason } => output::error(&format!("{}: {}", line, reason)),
        }
    }
}

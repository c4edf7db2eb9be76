//! Run report.
//!
//! Per-environment, per-target outcomes of a driver run. Serializable so the
//! CLI can print it as JSON.

use serde::Serialize;
use std::fmt;

/// Which surface a target writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    File,
    ClusterSecret,
    ClusterConfig,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::ClusterSecret => f.write_str("cluster-secret"),
            Self::ClusterConfig => f.write_str("cluster-config"),
        }
    }
}

/// Outcome of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Done { detail: String },
    Skipped { reason: String },
    Failed { reason: String },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// One target of one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub kind: TargetKind,
    /// File path or `namespace/name`
    pub location: String,
    pub outcome: Outcome,
}

/// Result of fetching an environment's secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchOutcome {
    Fetched { keys: usize },
    Failed { reason: String },
}

/// Everything that happened for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentReport {
    pub environment: String,
    pub identifier: String,
    pub fetch: FetchOutcome,
    pub targets: Vec<TargetReport>,
}

impl EnvironmentReport {
    /// Whether the fetch or any target failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.fetch, FetchOutcome::Failed { .. })
            || self.targets.iter().any(|t| t.outcome.is_failed())
    }

    /// Target of a given kind, if it was processed.
    pub fn target(&self, kind: TargetKind) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.kind == kind)
    }
}

/// Report of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub environments: Vec<EnvironmentReport>,
}

impl RunReport {
    /// No fetch and no target failed. Skips do not count as failures.
    pub fn is_success(&self) -> bool {
        !self.environments.iter().any(EnvironmentReport::is_failed)
    }

    /// Report for a named environment.
    pub fn environment(&self, name: &str) -> Option<&EnvironmentReport> {
        self.environments.iter().find(|e| e.environment == name)
    }

    /// Counts of (done, skipped, failed) targets, with failed fetches counted
    /// as failures.
    pub fn tally(&self) -> (usize, usize, usize) {
        let mut done = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for env in &self.environments {
            if matches!(env.fetch, FetchOutcome::Failed { .. }) {
                failed += 1;
            }
            for target in &env.targets {
                match target.outcome {
                    Outcome::Done { .. } => done += 1,
                    Outcome::Skipped { .. } => skipped += 1,
                    Outcome::Failed { .. } => failed += 1,
                }
            }
        }
        (done, skipped, failed)
    }
}

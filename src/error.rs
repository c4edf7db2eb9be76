//! Error types.
//!
//! One enum per concern, wrapped by [`Error`]. The environment driver catches
//! everything below `ConfigError` and records it per environment and target.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} target(s) failed")]
    RunFailed(usize),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid toml config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid json config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("no targets configured: add a [file] or [cluster] section")]
    NoTargets,

    #[error("unsupported store backend: {0}")]
    UnsupportedBackend(String),
}

/// Secret store and payload errors.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("failed to fetch secret '{identifier}': {reason}")]
    Fetch { identifier: String, reason: String },

    #[error("failed to decode secret '{identifier}': {reason}")]
    Decode { identifier: String, reason: String },

    #[error("value of '{key}' is not a scalar and cannot be used as text")]
    NotScalar { key: String },

    #[error("key not found in secret: {key}{}", format_suggestions(.available))]
    KeyNotFound { key: String, available: Vec<String> },
}

impl SecretError {
    /// Build a `KeyNotFound` listing the keys the secret does hold.
    pub fn key_not_found(key: impl Into<String>, available: &[&str]) -> Self {
        Self::KeyNotFound {
            key: key.into(),
            available: available.iter().map(|k| k.to_string()).collect(),
        }
    }
}

fn format_suggestions(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

/// File template materialization errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to back up {} to {}: {source}", .from.display(), .to.display())]
    Backup {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Cluster object materialization errors.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("cannot reach cluster: {0}")]
    Connect(String),

    #[error("failed to apply {kind} {namespace}/{name}: {reason}")]
    Apply {
        kind: &'static str,
        namespace: String,
        name: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

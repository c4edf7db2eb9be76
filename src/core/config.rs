//! Run configuration.
//!
//! Loaded once at startup from `sluice.toml` (or a YAML/JSON file), validated,
//! and then passed by reference to every component. Nothing mutates it
//! afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::types::KeyAliasTable;
use crate::error::{ConfigError, Result};

/// Declared run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct Config {
    /// Store region
    pub region: String,
    /// Named credentials profile for the store
    pub profile: Option<String>,
    /// Base secret path; environments are appended as `<base>/<environment>`
    pub secrets: String,
    /// Environments processed in declaration order
    pub environments: Vec<String>,
    /// Append `/<environment>` to the base secret path
    pub suffix_environment: bool,
    /// Secret store backend
    pub store: StoreConfig,
    /// File template target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileTarget>,
    /// Cluster object targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterTarget>,
    /// Placeholder -> secret key, for file templates and the cluster Secret
    pub secret_keys: KeyAliasTable,
    /// Placeholder -> secret key, for the cluster ConfigMap
    pub config_keys: KeyAliasTable,
}

/// On-disk shape of [`Config`].
///
/// Accepts both the sectioned layout and the flat `secretConfig.yml` layout,
/// where target fields sit at the top level.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default = "default_region")]
    region: String,
    #[serde(default)]
    profile: Option<String>,
    secrets: String,
    environments: Vec<String>,
    #[serde(default = "default_true")]
    suffix_environment: bool,
    #[serde(default)]
    store: StoreConfig,
    #[serde(default)]
    file: Option<FileTarget>,
    #[serde(default)]
    cluster: Option<ClusterTarget>,
    #[serde(default, alias = "secretkeys")]
    secret_keys: KeyAliasTable,
    #[serde(default, alias = "configkeys")]
    config_keys: KeyAliasTable,
    #[serde(flatten)]
    flat: FlatTargets,
}

/// Top-level target fields of the flat layout.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatTargets {
    config_file_prefix: Option<String>,
    ext: Option<String>,
    target_path: Option<PathBuf>,
    namespace: Option<String>,
    secrets_name: Option<String>,
    config_maps_name: Option<String>,
    k8s_host: Option<String>,
    config_file_path: Option<PathBuf>,
}

impl FlatTargets {
    fn file(&mut self) -> Option<FileTarget> {
        let prefix = self.config_file_prefix.take()?;
        Some(FileTarget {
            target_path: self
                .target_path
                .take()
                .unwrap_or_else(|| PathBuf::from(".")),
            prefix,
            ext: self.ext.take().unwrap_or_default(),
        })
    }

    fn cluster(&mut self) -> Option<ClusterTarget> {
        if self.secrets_name.is_none() && self.config_maps_name.is_none() {
            return None;
        }
        Some(ClusterTarget {
            namespace: self
                .namespace
                .take()
                .unwrap_or_else(|| constants::DEFAULT_NAMESPACE.to_string()),
            secret_name: self.secrets_name.take(),
            config_map_name: self.config_maps_name.take(),
            kubeconfig: self.config_file_path.take(),
            context: None,
            server: self.k8s_host.take().filter(|host| !host.is_empty()),
        })
    }
}

impl From<ConfigFile> for Config {
    fn from(mut raw: ConfigFile) -> Self {
        // Sections win over flat fields.
        let file = raw.file.or_else(|| raw.flat.file());
        let cluster = raw.cluster.or_else(|| raw.flat.cluster());

        Self {
            region: raw.region,
            profile: raw.profile,
            secrets: raw.secrets,
            environments: raw.environments,
            suffix_environment: raw.suffix_environment,
            store: raw.store,
            file,
            cluster,
            secret_keys: raw.secret_keys,
            config_keys: raw.config_keys,
        }
    }
}

/// Secret store selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Root directory for the `local` backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Available store backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Aws,
    Local,
}

/// File template target: `<target_path>/<prefix>[-<env>][.<ext>]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTarget {
    #[serde(alias = "targetPath")]
    pub target_path: PathBuf,
    #[serde(alias = "configFilePrefix")]
    pub prefix: String,
    #[serde(default)]
    pub ext: String,
}

/// Cluster target: one namespace, a Secret and/or a ConfigMap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterTarget {
    pub namespace: String,
    #[serde(default, alias = "secretsName")]
    pub secret_name: Option<String>,
    #[serde(default, alias = "configMapsName")]
    pub config_map_name: Option<String>,
    #[serde(default, alias = "configFilePath")]
    pub kubeconfig: Option<PathBuf>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default, alias = "k8sHost")]
    pub server: Option<String>,
}

fn default_region() -> String {
    constants::DEFAULT_REGION.to_string()
}

fn default_true() -> bool {
    true
}

/// On-disk formats accepted by [`Config::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

impl Config {
    /// Default configuration path in the current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load and validate configuration.
    ///
    /// The format is picked from the extension: `.yml`/`.yaml`, `.json`,
    /// anything else is TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file is missing, a parse error
    /// for malformed content, or a validation error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = Self::parse(&contents, Format::from_path(path))?;

        debug!(
            environments = config.environments.len(),
            secret_keys = config.secret_keys.len(),
            config_keys = config.config_keys.len(),
            "config loaded"
        );

        config.validate()?;
        Ok(config)
    }

    fn parse(contents: &str, format: Format) -> Result<Self> {
        let config = match format {
            Format::Toml => toml::from_str(contents).map_err(ConfigError::Toml)?,
            Format::Yaml => serde_yaml::from_str(contents).map_err(ConfigError::Yaml)?,
            Format::Json => serde_json::from_str(contents).map_err(ConfigError::Json)?,
        };
        Ok(config)
    }

    /// Parse and validate TOML content.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config = Self::parse(contents, Format::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structure and contents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` or `ConfigError::InvalidValue`.
    pub fn validate(&self) -> Result<()> {
        if self.secrets.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "secrets" }.into());
        }

        if self.region.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "region" }.into());
        }

        if self.environments.is_empty() {
            return Err(ConfigError::MissingField {
                field: "environments",
            }
            .into());
        }

        for env in &self.environments {
            if env.trim().is_empty() || env.contains('/') || env.contains("..") {
                return Err(ConfigError::InvalidValue {
                    field: "environments",
                    reason: format!("invalid environment name '{}'", env),
                }
                .into());
            }
        }

        if self.store.backend == StoreBackend::Local && self.store.dir.is_none() {
            return Err(ConfigError::MissingField { field: "store.dir" }.into());
        }

        if let Some(file) = &self.file {
            if file.prefix.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "file.prefix",
                }
                .into());
            }
        }

        if let Some(cluster) = &self.cluster {
            if cluster.namespace.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "cluster.namespace",
                }
                .into());
            }
            if cluster.secret_name.is_none() && cluster.config_map_name.is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "cluster",
                    reason: "set secret_name, config_map_name, or both".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Secret identifier for an environment.
    pub fn identifier(&self, environment: &str) -> String {
        if self.suffix_environment {
            format!("{}/{}", self.secrets.trim_end_matches('/'), environment)
        } else {
            self.secrets.clone()
        }
    }

    /// Whether any target is configured.
    pub fn has_targets(&self) -> bool {
        self.file.is_some() || self.cluster.is_some()
    }
}

impl ClusterTarget {
    /// Kubeconfig path with a leading `~` expanded.
    pub fn kubeconfig_path(&self) -> Option<PathBuf> {
        let path = self.kubeconfig.as_ref()?;
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(path.clone()),
        }
    }
}

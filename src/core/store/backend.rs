//! Store backend selection.

use tracing::debug;

use super::{LocalStore, SecretStore};
use crate::core::config::{Config, StoreBackend};
use crate::error::{ConfigError, Result};

/// Build the secret store named by the configuration.
///
/// # Errors
///
/// Returns `ConfigError::UnsupportedBackend` when `aws` is requested but the
/// crate was built without the `aws` feature.
pub fn from_config(config: &Config) -> Result<Box<dyn SecretStore>> {
    match config.store.backend {
        StoreBackend::Local => {
            let dir = config
                .store
                .dir
                .clone()
                .ok_or(ConfigError::MissingField { field: "store.dir" })?;
            debug!(dir = %dir.display(), "using local store backend");
            Ok(Box::new(LocalStore::new(dir)))
        }
        StoreBackend::Aws => {
            #[cfg(feature = "aws")]
            {
                debug!(profile = ?config.profile, "using AWS Secrets Manager backend");
                Ok(Box::new(super::aws::AwsSecretsManager::new(
                    config.profile.clone(),
                )))
            }
            #[cfg(not(feature = "aws"))]
            {
                Err(ConfigError::UnsupportedBackend(
                    "aws support not compiled. Rebuild with: cargo install sluice --features aws"
                        .to_string(),
                )
                .into())
            }
        }
    }
}

//! Get command - print a secret or a single key of it.

use std::path::Path;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::Config;
use crate::core::constants;
use crate::core::secrets;
use crate::core::store::{self, SecretStore};
use crate::error::{ConfigError, Error, Result, SecretError};

/// Print the decoded payload of `identifier`, or the text form of one key.
///
/// Store settings come from the configuration when one is found. Without an
/// explicit `--config`, a missing default file falls back to the AWS store
/// in the default region.
pub fn execute(
    config_path: Option<&Path>,
    identifier: &str,
    key: Option<&str>,
    region: Option<&str>,
    profile: Option<&str>,
) -> Result<()> {
    let (store, config_region) = open_store(config_path, profile)?;
    let region = region.unwrap_or(config_region.as_str());
    debug!(identifier, region, store = store.name(), "get secret");

    let text = secrets::fetch_text(store.as_ref(), identifier, region)?;

    let Some(key) = key else {
        println!("{}", text.as_str());
        return Ok(());
    };

    let map = secrets::parse(identifier, &text);
    match map.get(key) {
        Some(value) => {
            let value = Zeroizing::new(value.coerce(key)?);
            println!("{}", value.as_str());
            Ok(())
        }
        None => {
            let available: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(SecretError::key_not_found(key, &available).into())
        }
    }
}

/// Open the configured store, returning it with the configured region.
fn open_store(
    config_path: Option<&Path>,
    profile: Option<&str>,
) -> Result<(Box<dyn SecretStore>, String)> {
    let loaded = match config_path {
        Some(path) => Some(Config::load(path)?),
        None => match Config::load(&Config::default_path()) {
            Ok(config) => Some(config),
            Err(Error::Config(ConfigError::NotFound(_))) => None,
            Err(e) => return Err(e),
        },
    };

    match loaded {
        Some(mut config) => {
            if let Some(profile) = profile {
                config.profile = Some(profile.to_string());
            }
            let store = store::from_config(&config)?;
            Ok((store, config.region))
        }
        None => {
            debug!("no config file, using default store settings");
            Ok((
                default_store(profile)?,
                constants::DEFAULT_REGION.to_string(),
            ))
        }
    }
}

fn default_store(profile: Option<&str>) -> Result<Box<dyn SecretStore>> {
    #[cfg(feature = "aws")]
    {
        Ok(Box::new(store::aws::AwsSecretsManager::new(
            profile.map(str::to_string),
        )))
    }
    #[cfg(not(feature = "aws"))]
    {
        let _ = profile;
        Err(ConfigError::UnsupportedBackend(
            "aws support not compiled. Rebuild with: cargo install sluice --features aws"
                .to_string(),
        )
        .into())
    }
}

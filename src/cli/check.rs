//! Check command - validate configuration and show derived targets.
//!
//! Works offline: nothing is fetched and the cluster is never contacted.

use std::path::Path;

use crate::cli::output;
use crate::core::config::{Config, StoreBackend};
use crate::core::template::TemplateTarget;
use crate::error::{ConfigError, Result};

/// Validate the configuration and list what `apply` would touch.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    output::header(&output::path(&config_path.display().to_string()));
    output::kv("region:", &config.region);
    match config.store.backend {
        StoreBackend::Aws => output::kv(
            "store:",
            format!(
                "aws (profile: {})",
                config.profile.as_deref().unwrap_or("default")
            ),
        ),
        StoreBackend::Local => output::kv(
            "store:",
            format!(
                "local ({})",
                config
                    .store
                    .dir
                    .as_deref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default()
            ),
        ),
    }
    output::kv("secret keys:", config.secret_keys.len());
    output::kv("config keys:", config.config_keys.len());

    let mut missing = 0;
    for env in &config.environments {
        output::section(env);
        output::kv("secret:", config.identifier(env));

        if let Some(file) = &config.file {
            let target = TemplateTarget::for_environment(file, env);
            let location = output::path(&target.active.display().to_string());
            if target.exists() {
                output::success(&format!("file {}", location));
            } else {
                missing += 1;
                output::warn(&format!("file {} (template not found)", location));
            }
        }

        if let Some(cluster) = &config.cluster {
            if let Some(name) = &cluster.secret_name {
                output::success(&format!("secret {}/{}", cluster.namespace, name));
            }
            if let Some(name) = &cluster.config_map_name {
                output::success(&format!("configmap {}/{}", cluster.namespace, name));
            }
        }
    }

    println!();
    if !config.has_targets() {
        return Err(ConfigError::NoTargets.into());
    }
    if missing > 0 {
        output::hint(&format!(
            "{} template(s) missing; apply will skip them",
            missing
        ));
    }
    output::success("configuration is valid");
    Ok(())
}

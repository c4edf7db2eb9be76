//! Environment driver.
//!
//! Walks the declared environments in order. Each environment gets exactly
//! one secret fetch; the resulting map is projected once per configured
//! target kind and handed to the matching materializer. Failures are recorded
//! in the [`RunReport`] and never stop the run.

use tracing::{debug, info, warn};

use crate::core::cluster::{self, Cluster, ObjectKind, ObjectRef};
use crate::core::config::Config;
use crate::core::mapper;
use crate::core::report::{
    EnvironmentReport, FetchOutcome, Outcome, RunReport, TargetKind, TargetReport,
};
use crate::core::secrets;
use crate::core::store::SecretStore;
use crate::core::template::{self, TemplateTarget};
use crate::core::types::{KeyAliasTable, SecretMap};
use crate::error::{ClusterError, Error, TemplateError};

/// Restrict a run to one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Only {
    File,
    Cluster,
}

/// Driver options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Render and report without writing files or touching the cluster
    pub dry_run: bool,
    /// Process only one surface
    pub only: Option<Only>,
}

/// Drives the fetch, map, materialize pipeline across environments.
pub struct Driver<'a> {
    config: &'a Config,
    store: &'a dyn SecretStore,
    cluster: Option<&'a dyn Cluster>,
    options: Options,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a Config, store: &'a dyn SecretStore) -> Self {
        Self {
            config,
            store,
            cluster: None,
            options: Options::default(),
        }
    }

    /// Cluster client used for `[cluster]` targets.
    pub fn with_cluster(mut self, cluster: &'a dyn Cluster) -> Self {
        self.cluster = Some(cluster);
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Process every environment.
    pub fn run(&self) -> RunReport {
        info!(
            environments = self.config.environments.len(),
            store = self.store.name(),
            dry_run = self.options.dry_run,
            "starting run"
        );

        let environments = self
            .config
            .environments
            .iter()
            .map(|env| self.run_environment(env))
            .collect();

        let report = RunReport { environments };
        let (done, skipped, failed) = report.tally();
        info!(done, skipped, failed, "run finished");
        report
    }

    /// Process a single environment.
    pub fn run_environment(&self, environment: &str) -> EnvironmentReport {
        let identifier = self.config.identifier(environment);
        debug!(environment, identifier = %identifier, "processing environment");

        let secrets = match secrets::resolve(self.store, &identifier, &self.config.region) {
            Ok(secrets) => secrets,
            Err(e) => {
                warn!(environment, error = %e, "failed to resolve secret, skipping environment");
                return EnvironmentReport {
                    environment: environment.to_string(),
                    identifier,
                    fetch: FetchOutcome::Failed {
                        reason: e.to_string(),
                    },
                    targets: Vec::new(),
                };
            }
        };

        let mut targets = Vec::new();

        if self.wants(Only::File) {
            if let Some(file) = &self.config.file {
                let target = TemplateTarget::for_environment(file, environment);
                targets.push(self.apply_file(&target, &secrets));
            }
        }

        if self.wants(Only::Cluster) {
            if let Some(cluster) = &self.config.cluster {
                if let Some(name) = &cluster.secret_name {
                    let reference = ObjectRef::new(ObjectKind::Secret, &cluster.namespace, name);
                    targets.push(self.apply_object(
                        TargetKind::ClusterSecret,
                        reference,
                        &secrets,
                        &self.config.secret_keys,
                    ));
                }
                if let Some(name) = &cluster.config_map_name {
                    let reference =
                        ObjectRef::new(ObjectKind::ConfigMap, &cluster.namespace, name);
                    targets.push(self.apply_object(
                        TargetKind::ClusterConfig,
                        reference,
                        &secrets,
                        &self.config.config_keys,
                    ));
                }
            }
        }

        for target in &targets {
            match &target.outcome {
                Outcome::Done { detail } => {
                    info!(environment, kind = %target.kind, location = %target.location, detail = %detail, "target done")
                }
                Outcome::Skipped { reason } => {
                    warn!(environment, kind = %target.kind, location = %target.location, reason = %reason, "target skipped")
                }
                Outcome::Failed { reason } => {
                    warn!(environment, kind = %target.kind, location = %target.location, reason = %reason, "target failed")
                }
            }
        }

        EnvironmentReport {
            environment: environment.to_string(),
            identifier,
            fetch: FetchOutcome::Fetched {
                keys: secrets.len(),
            },
            targets,
        }
    }

    fn wants(&self, surface: Only) -> bool {
        self.options.only.map_or(true, |only| only == surface)
    }

    fn apply_file(&self, target: &TemplateTarget, secrets: &SecretMap) -> TargetReport {
        let mapped = mapper::map(secrets, &self.config.secret_keys);

        let result = if self.options.dry_run {
            template::preview(target, &mapped)
        } else {
            template::materialize(target, &mapped)
        };

        let outcome = match result {
            Ok(rendered) => Outcome::Done {
                detail: format!(
                    "{} {} substituted, {} unresolved",
                    if self.options.dry_run { "would write:" } else { "written:" },
                    rendered.substituted.len(),
                    rendered.unresolved.len()
                ),
            },
            Err(Error::Template(TemplateError::Missing(path))) => Outcome::Skipped {
                reason: format!("template not found: {}", path.display()),
            },
            Err(e) => Outcome::Failed {
                reason: e.to_string(),
            },
        };

        TargetReport {
            kind: TargetKind::File,
            location: target.active.display().to_string(),
            outcome,
        }
    }

    fn apply_object(
        &self,
        kind: TargetKind,
        reference: ObjectRef,
        secrets: &SecretMap,
        aliases: &KeyAliasTable,
    ) -> TargetReport {
        let mapped = mapper::map(secrets, aliases);
        let location = format!("{}/{}", reference.namespace, reference.name);

        let outcome = if self.options.dry_run {
            match cluster::ClusterObject::build(reference, &mapped) {
                Ok(object) => Outcome::Done {
                    detail: format!("would apply {} keys", object.data.len()),
                },
                Err(e) => Outcome::Failed {
                    reason: e.to_string(),
                },
            }
        } else {
            match self.cluster {
                Some(client) => match cluster::materialize(client, reference, &mapped) {
                    Ok(applied) => Outcome::Done {
                        detail: format!("{} ({} keys)", applied, mapped.len()),
                    },
                    Err(e) => Outcome::Failed {
                        reason: e.to_string(),
                    },
                },
                None => Outcome::Failed {
                    reason: ClusterError::Connect("no cluster client configured".to_string())
                        .to_string(),
                },
            }
        };

        TargetReport {
            kind,
            location,
            outcome,
        }
    }
}

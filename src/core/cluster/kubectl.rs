//! Kubernetes backend using the kubectl CLI.
//!
//! ## Requirements
//!
//! - `kubectl` must be installed and on `PATH`
//! - The kubeconfig (explicit, or kubectl's default) must grant get, create
//!   and update on Secrets/ConfigMaps in the target namespace
//!
//! ## Usage
//!
//! ```toml
//! [cluster]
//! namespace = "apps"
//! secret_name = "app-secrets"
//! config_map_name = "app-config"
//! kubeconfig = "~/.kube/config"
//! ```
//!
//! Objects are read with `kubectl get -o json`, created with
//! `kubectl create -f -` and replaced wholesale with `kubectl replace -f -`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use ::base64::Engine;
use serde_json::{json, Value};
use tracing::trace;

use super::{Cluster, ClusterObject, Lookup, ObjectData, ObjectKind, ObjectRef};
use crate::core::config::ClusterTarget;
use crate::error::{ClusterError, Result};

/// kubectl-backed cluster client.
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
    server: Option<String>,
}

/// How a failed kubectl call should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    NotFound,
    Connect,
    Rejected,
}

impl Kubectl {
    /// Create a client from the cluster target configuration.
    pub fn new(target: &ClusterTarget) -> Self {
        Self {
            binary: PathBuf::from("kubectl"),
            kubeconfig: target.kubeconfig_path(),
            context: target.context.clone(),
            server: target.server.clone(),
        }
    }

    /// Use a specific kubectl binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Check that kubectl and the kubeconfig are available.
    fn check(&self) -> Result<()> {
        which::which(&self.binary).map_err(|_| {
            ClusterError::Connect(format!(
                "{} not found. Install it from https://kubernetes.io/docs/tasks/tools/",
                self.binary.display()
            ))
        })?;

        if let Some(path) = &self.kubeconfig {
            if !path.exists() {
                return Err(ClusterError::Connect(format!(
                    "kubeconfig not found: {}",
                    path.display()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Global flags shared by every invocation.
    fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(path) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(path.display().to_string());
        }
        if let Some(context) = &self.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        if let Some(server) = &self.server {
            args.push("--server".to_string());
            args.push(server.clone());
        }
        args
    }

    fn run(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<Output> {
        trace!(binary = %self.binary.display(), ?args, "running kubectl");

        let mut child = Command::new(&self.binary)
            .args(self.global_args())
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClusterError::Connect(format!("failed to spawn kubectl: {}", e)))?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input)
                .map_err(|e| ClusterError::Connect(format!("failed to write manifest: {}", e)))?;
        }

        child
            .wait_with_output()
            .map_err(|e| ClusterError::Connect(format!("kubectl command failed: {}", e)).into())
    }

    /// Create or replace via a manifest on stdin.
    fn submit(&self, verb: &str, object: &ClusterObject) -> Result<()> {
        self.check()?;

        let manifest = serde_json::to_vec(&manifest(object)).map_err(|e| {
            apply_err(&object.reference, format!("failed to encode manifest: {}", e))
        })?;
        let output = self.run(&[verb, "-f", "-", "-o", "name"], Some(&manifest))?;

        if !output.status.success() {
            return Err(failure(&object.reference, verb, &output).into());
        }
        trace!(object = %object.reference, verb, "kubectl applied object");
        Ok(())
    }
}

impl Cluster for Kubectl {
    fn get(&self, reference: &ObjectRef) -> Result<Lookup> {
        self.check()?;

        let resource = resource_name(reference.kind);
        let output = self.run(
            &[
                "get",
                resource,
                reference.name.as_str(),
                "-n",
                reference.namespace.as_str(),
                "-o",
                "json",
            ],
            None,
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if classify(&stderr) == Failure::NotFound {
                return Ok(Lookup::NotFound);
            }
            return Err(failure(reference, "get", &output).into());
        }

        let body: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| apply_err(reference, format!("invalid kubectl output: {}", e)))?;
        let data = parse_data(reference, &body)?;

        Ok(Lookup::Found(ClusterObject {
            reference: reference.clone(),
            data,
        }))
    }

    fn create(&self, object: &ClusterObject) -> Result<()> {
        self.submit("create", object)
    }

    fn update(&self, object: &ClusterObject) -> Result<()> {
        self.submit("replace", object)
    }

    fn name(&self) -> &'static str {
        "kubectl"
    }
}

fn resource_name(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Secret => "secret",
        ObjectKind::ConfigMap => "configmap",
    }
}

fn apply_err(reference: &ObjectRef, reason: String) -> ClusterError {
    ClusterError::Apply {
        kind: reference.kind.as_str(),
        namespace: reference.namespace.clone(),
        name: reference.name.clone(),
        reason,
    }
}

/// Sort kubectl stderr into not-found, connectivity, or rejection.
fn classify(stderr: &str) -> Failure {
    if stderr.contains("Unable to connect")
        || stderr.contains("connection refused")
        || stderr.contains("no configuration has been provided")
        || stderr.contains("context was not found")
        || stderr.contains("i/o timeout")
        || stderr.contains("getting credentials")
    {
        Failure::Connect
    } else if stderr.contains("(NotFound)") {
        Failure::NotFound
    } else {
        Failure::Rejected
    }
}

fn failure(reference: &ObjectRef, verb: &str, output: &Output) -> ClusterError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    match classify(&stderr) {
        Failure::Connect => ClusterError::Connect(stderr),
        _ => apply_err(reference, format!("kubectl {} failed: {}", verb, stderr)),
    }
}

/// Kubernetes manifest for an object. Secret data is base64-encoded.
fn manifest(object: &ClusterObject) -> Value {
    let reference = &object.reference;
    let metadata = json!({
        "name": reference.name,
        "namespace": reference.namespace,
    });

    match &object.data {
        ObjectData::Bytes(data) => {
            let encoded: BTreeMap<&str, String> = data
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str(),
                        ::base64::engine::general_purpose::STANDARD.encode(v),
                    )
                })
                .collect();
            json!({
                "apiVersion": "v1",
                "kind": reference.kind.as_str(),
                "metadata": metadata,
                "type": "Opaque",
                "data": encoded,
            })
        }
        ObjectData::Strings(data) => json!({
            "apiVersion": "v1",
            "kind": reference.kind.as_str(),
            "metadata": metadata,
            "data": data,
        }),
    }
}

/// Extract the data payload from `kubectl get -o json` output.
fn parse_data(reference: &ObjectRef, body: &Value) -> Result<ObjectData> {
    let entries = body
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    match reference.kind {
        ObjectKind::Secret => {
            let mut data = BTreeMap::new();
            for (key, value) in entries {
                let encoded = value.as_str().unwrap_or_default();
                let bytes = ::base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| {
                        apply_err(reference, format!("invalid base64 in key '{}': {}", key, e))
                    })?;
                data.insert(key, bytes);
            }
            Ok(ObjectData::Bytes(data))
        }
        ObjectKind::ConfigMap => Ok(ObjectData::Strings(
            entries
                .into_iter()
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (key, text)
                })
                .collect(),
        )),
    }
}

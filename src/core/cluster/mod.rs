//! Cluster object materialization.
//!
//! Applies mapped values to a Kubernetes Secret or ConfigMap with
//! create-or-replace semantics: a missing object is created, an existing one
//! has its whole data payload replaced. Keys from a previous apply that are
//! no longer mapped are dropped.
//!
//! The orchestration client sits behind the [`Cluster`] trait.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::types::MappedValues;
use crate::error::Result;

mod kubectl;
mod memory;

pub use kubectl::Kubectl;
pub use memory::MemoryCluster;

/// Kind of configuration object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Byte-valued data
    Secret,
    /// String-valued data
    ConfigMap,
}

impl ObjectKind {
    /// Kubernetes kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secret => "Secret",
            Self::ConfigMap => "ConfigMap",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a cluster object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub namespace: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, namespace: &str, name: &str) -> Self {
        Self {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// Data payload of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectData {
    Bytes(BTreeMap<String, Vec<u8>>),
    Strings(BTreeMap<String, String>),
}

impl ObjectData {
    /// Number of keys.
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(data) => data.len(),
            Self::Strings(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key names, sorted.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Bytes(data) => data.keys().map(String::as_str).collect(),
            Self::Strings(data) => data.keys().map(String::as_str).collect(),
        }
    }
}

/// A complete object: identity plus data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterObject {
    pub reference: ObjectRef,
    pub data: ObjectData,
}

impl ClusterObject {
    /// Build an object from mapped values.
    ///
    /// Secrets receive byte values, ConfigMaps string values.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::NotScalar` for nested values.
    pub fn build(reference: ObjectRef, mapped: &MappedValues) -> Result<Self> {
        let data = match reference.kind {
            ObjectKind::Secret => ObjectData::Bytes(
                mapped
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.coerce(key)?.into_bytes())))
                    .collect::<Result<_>>()?,
            ),
            ObjectKind::ConfigMap => ObjectData::Strings(
                mapped
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.coerce(key)?)))
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(Self { reference, data })
    }
}

/// Outcome of looking an object up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ClusterObject),
    NotFound,
}

/// What [`materialize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Applied {
    Created,
    Replaced,
}

impl fmt::Display for Applied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Replaced => f.write_str("replaced"),
        }
    }
}

/// Orchestration client trait.
///
/// Implementations report transport problems as `ClusterError::Connect` and
/// rejected operations as `ClusterError::Apply`.
pub trait Cluster {
    /// Look an object up. A missing object is `Lookup::NotFound`, not an error.
    fn get(&self, reference: &ObjectRef) -> Result<Lookup>;

    /// Create a new object.
    fn create(&self, object: &ClusterObject) -> Result<()>;

    /// Replace an existing object's data.
    fn update(&self, object: &ClusterObject) -> Result<()>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

/// Create or replace an object from mapped values.
///
/// # Errors
///
/// Returns `ClusterError::Connect` or `ClusterError::Apply` from the client,
/// or `SecretError::NotScalar` if a value cannot be used as object data.
pub fn materialize(
    cluster: &dyn Cluster,
    reference: ObjectRef,
    mapped: &MappedValues,
) -> Result<Applied> {
    debug!(object = %reference, keys = mapped.len(), "materializing cluster object");

    let object = ClusterObject::build(reference, mapped)?;

    let applied = match cluster.get(&object.reference)? {
        Lookup::NotFound => {
            cluster.create(&object)?;
            Applied::Created
        }
        Lookup::Found(existing) => {
            debug!(
                object = %existing.reference,
                previous_keys = existing.data.len(),
                "replacing existing object"
            );
            cluster.update(&object)?;
            Applied::Replaced
        }
    };

    info!(object = %object.reference, keys = object.data.len(), %applied, "cluster object applied");
    Ok(applied)
}

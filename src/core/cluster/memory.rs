//! In-memory cluster.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{Cluster, ClusterObject, Lookup, ObjectRef};
use crate::error::{ClusterError, Result};

/// In-memory cluster holding objects by reference.
///
/// `MemoryCluster::unreachable()` builds one whose every call fails with
/// `ClusterError::Connect`.
#[derive(Debug, Default)]
pub struct MemoryCluster {
    objects: RefCell<BTreeMap<ObjectRef, ClusterObject>>,
    unreachable: bool,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cluster that cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Current state of an object.
    pub fn object(&self, reference: &ObjectRef) -> Option<ClusterObject> {
        self.objects.borrow().get(reference).cloned()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<()> {
        if self.unreachable {
            return Err(ClusterError::Connect("memory cluster is unreachable".to_string()).into());
        }
        Ok(())
    }

    fn apply_err(object: &ClusterObject, reason: &str) -> ClusterError {
        ClusterError::Apply {
            kind: object.reference.kind.as_str(),
            namespace: object.reference.namespace.clone(),
            name: object.reference.name.clone(),
            reason: reason.to_string(),
        }
    }
}

impl Cluster for MemoryCluster {
    fn get(&self, reference: &ObjectRef) -> Result<Lookup> {
        self.check()?;
        Ok(match self.objects.borrow().get(reference) {
            Some(object) => Lookup::Found(object.clone()),
            None => Lookup::NotFound,
        })
    }

    fn create(&self, object: &ClusterObject) -> Result<()> {
        self.check()?;
        let mut objects = self.objects.borrow_mut();
        if objects.contains_key(&object.reference) {
            return Err(Self::apply_err(object, "already exists").into());
        }
        objects.insert(object.reference.clone(), object.clone());
        Ok(())
    }

    fn update(&self, object: &ClusterObject) -> Result<()> {
        self.check()?;
        let mut objects = self.objects.borrow_mut();
        match objects.get_mut(&object.reference) {
            Some(existing) => {
                *existing = object.clone();
                Ok(())
            }
            None => Err(Self::apply_err(object, "not found").into()),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

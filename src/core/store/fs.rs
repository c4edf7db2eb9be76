//! Directory-backed secret store.
//!
//! Reads payloads from `<dir>/<identifier>.json` (text) or
//! `<dir>/<identifier>.b64` (binary). Identifiers may contain `/`, which map
//! to subdirectories. Useful offline and in tests.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use super::{RawPayload, SecretStore};
use crate::core::constants::{LOCAL_BINARY_EXT, LOCAL_TEXT_EXT};
use crate::error::{Result, SecretError};

/// Directory-backed secret store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn payload_path(&self, identifier: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", identifier, ext))
    }
}

impl SecretStore for LocalStore {
    fn fetch(&self, identifier: &str, _region: &str) -> Result<RawPayload> {
        let fetch_err = |reason: String| SecretError::Fetch {
            identifier: identifier.to_string(),
            reason,
        };

        // Identifiers must stay under the store root.
        if Path::new(identifier)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(
                fetch_err("identifier must be a relative path without '..'".to_string()).into(),
            );
        }

        let text_path = self.payload_path(identifier, LOCAL_TEXT_EXT);
        if text_path.exists() {
            trace!(path = %text_path.display(), "reading text payload");
            let text = fs::read_to_string(&text_path).map_err(|e| fetch_err(e.to_string()))?;
            return Ok(RawPayload::Text(text));
        }

        let binary_path = self.payload_path(identifier, LOCAL_BINARY_EXT);
        if binary_path.exists() {
            trace!(path = %binary_path.display(), "reading binary payload");
            let bytes = fs::read(&binary_path).map_err(|e| fetch_err(e.to_string()))?;
            return Ok(RawPayload::Binary(bytes));
        }

        Err(fetch_err(format!("secret not found under {}", self.dir.display())).into())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

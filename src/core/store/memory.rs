//! In-memory secret store.

use std::collections::HashMap;

use super::{RawPayload, SecretStore};
use crate::error::{Result, SecretError};

/// In-memory secret store keyed by identifier.
///
/// Region is ignored. Fetches of unknown identifiers fail like a remote
/// not-found.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    secrets: HashMap<String, RawPayload>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a text payload.
    pub fn with_text(mut self, identifier: &str, text: &str) -> Self {
        self.secrets
            .insert(identifier.to_string(), RawPayload::Text(text.to_string()));
        self
    }

    /// Store a binary (base64) payload.
    pub fn with_binary(mut self, identifier: &str, bytes: &[u8]) -> Self {
        self.secrets
            .insert(identifier.to_string(), RawPayload::Binary(bytes.to_vec()));
        self
    }
}

impl SecretStore for MemoryStore {
    fn fetch(&self, identifier: &str, _region: &str) -> Result<RawPayload> {
        self.secrets.get(identifier).cloned().ok_or_else(|| {
            SecretError::Fetch {
                identifier: identifier.to_string(),
                reason: "secret not found".to_string(),
            }
            .into()
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

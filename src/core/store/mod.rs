//! Secret store backends.
//!
//! A store hands back the raw payload of a secret and nothing else: decoding
//! and parsing live in [`crate::core::secrets`].
//!
//! ## Adding a New Store Backend
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file (e.g., `ssm.rs`, `gcp.rs`)
//! 3. Feature-gate if it pulls in a cloud SDK
//! 4. Wire it into [`from_config`]

use crate::error::Result;

mod backend;
mod fs;
mod memory;

#[cfg(feature = "aws")]
pub mod aws;

pub use backend::from_config;
pub use fs::LocalStore;
pub use memory::MemoryStore;

/// Raw secret payload as returned by a store.
///
/// Exactly one form is present per fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// UTF-8 text, expected to hold a JSON object.
    Text(String),
    /// Base64-encoded bytes, expected to decode to a JSON object.
    Binary(Vec<u8>),
}

/// Secret store trait.
///
/// Abstracts the remote secret store so the pipeline can run against
/// AWS Secrets Manager, a local directory, or an in-memory fake.
pub trait SecretStore {
    /// Fetch the current version of a secret.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Secret name or ARN, already environment-suffixed
    /// * `region` - Store region
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Fetch` when the store is unreachable, the caller
    /// is not authorized, or the secret does not exist.
    fn fetch(&self, identifier: &str, region: &str) -> Result<RawPayload>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

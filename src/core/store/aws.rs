//! AWS Secrets Manager store backend.
//!
//! Enable with `--features aws` (on by default).
//!
//! ## Usage
//!
//! ```toml
//! region = "ap-northeast-2"
//! profile = "deploy"
//! secrets = "myapp/config"
//!
//! [store]
//! backend = "aws"
//! ```
//!
//! Credentials come from the named profile when set, otherwise from the
//! default provider chain (AWS_ACCESS_KEY_ID, instance metadata, ...).

use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use tracing::trace;

use super::{RawPayload, SecretStore};
use crate::core::constants::VERSION_STAGE;
use crate::error::{Result, SecretError};

/// AWS Secrets Manager backend.
///
/// Always reads the `AWSCURRENT` stage. `SecretBinary` is handed back as-is;
/// the resolver treats it as base64 text.
#[derive(Debug, Clone)]
pub struct AwsSecretsManager {
    profile: Option<String>,
}

impl AwsSecretsManager {
    /// Create a backend using an optional named profile.
    pub fn new(profile: Option<String>) -> Self {
        Self { profile }
    }
}

impl SecretStore for AwsSecretsManager {
    fn fetch(&self, identifier: &str, region: &str) -> Result<RawPayload> {
        trace!(identifier, region, "fetching from AWS Secrets Manager");

        let fetch_err = |reason: String| SecretError::Fetch {
            identifier: identifier.to_string(),
            reason,
        };

        // Create a tokio runtime for the async AWS SDK
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| fetch_err(format!("failed to create runtime: {}", e)))?;

        rt.block_on(async {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(Region::new(region.to_string()));
            if let Some(profile) = &self.profile {
                loader = loader.profile_name(profile);
            }
            let config = loader.load().await;
            let client = aws_sdk_secretsmanager::Client::new(&config);

            let result = client
                .get_secret_value()
                .secret_id(identifier)
                .version_stage(VERSION_STAGE)
                .send()
                .await
                .map_err(|e| fetch_err(DisplayErrorContext(&e).to_string()))?;

            if let Some(text) = result.secret_string() {
                trace!(payload_len = text.len(), "received text payload");
                return Ok(RawPayload::Text(text.to_string()));
            }

            let blob = result
                .secret_binary()
                .ok_or_else(|| fetch_err("response carried no payload".to_string()))?;
            trace!(payload_len = blob.as_ref().len(), "received binary payload");
            Ok::<_, crate::error::Error>(RawPayload::Binary(blob.as_ref().to_vec()))
        })
    }

    fn name(&self) -> &'static str {
        "aws"
    }
}

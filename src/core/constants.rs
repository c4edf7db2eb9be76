//! Constants used throughout sluice.
//!
//! Centralizes magic strings and default values.

/// Default configuration file name.
pub const CONFIG_FILE: &str = "sluice.toml";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "SLUICE_LOG";

/// Default AWS region when the config does not name one.
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Environment name whose templates carry no `-<environment>` suffix.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Backup directory created under the template target path.
pub const BACKUP_DIR: &str = "orig";

/// Secrets Manager version stage that is always fetched.
pub const VERSION_STAGE: &str = "AWSCURRENT";

/// Local store file extension for text payloads.
pub const LOCAL_TEXT_EXT: &str = "json";

/// Local store file extension for base64 binary payloads.
pub const LOCAL_BINARY_EXT: &str = "b64";

/// Namespace used when a flat config names objects but no namespace.
pub const DEFAULT_NAMESPACE: &str = "default";

//! Test fixtures and constants.

/// Local store directory, relative to the project dir.
pub const STORE_DIR: &str = "secrets";

/// Template directory, relative to the project dir.
pub const TEMPLATE_DIR: &str = "config";

/// Standard payload used across tests.
pub const PAYLOAD: &str = r#"{"DB_PASS":"s3cr3t","API_KEY":"abc123"}"#;

/// File-only configuration over two environments.
pub const FILE_CONFIG: &str = r#"
secrets = "myapp"
environments = ["default", "staging"]

[store]
backend = "local"
dir = "secrets"

[file]
target_path = "config"
prefix = "application"
ext = "yml"

[secret_keys]
password = "DB_PASS"
"#;

/// File and cluster configuration whose kubeconfig does not exist.
pub const UNREACHABLE_CLUSTER_CONFIG: &str = r#"
secrets = "myapp"
environments = ["default"]

[store]
backend = "local"
dir = "secrets"

[file]
target_path = "config"
prefix = "application"
ext = "yml"

[cluster]
namespace = "apps"
secret_name = "app-secrets"
config_map_name = "app-config"
kubeconfig = "missing-kubeconfig"

[secret_keys]
password = "DB_PASS"

[config_keys]
api_key = "API_KEY"
"#;

/// Template content shared by the default and staging files.
pub const TEMPLATE: &str = "spring:\n  datasource:\n    pass: ${password}\n";

//! Sluice - materialize secrets into config templates and cluster objects.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── apply         # Run the pipeline across environments
//! │   ├── get           # Print one secret or key
//! │   ├── check         # Validate config, list targets
//! │   ├── completions   # Shell completions
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # sluice.toml loading and validation
//!     ├── store/        # Secret store backends
//!     │   ├── mod       # SecretStore trait
//!     │   ├── aws       # AWS Secrets Manager (feature `aws`)
//!     │   ├── fs        # Directory-backed store
//!     │   └── memory    # In-memory store
//!     ├── secrets       # Fetch, decode, parse
//!     ├── value         # Tagged secret values
//!     ├── mapper        # Secret key -> placeholder mapping
//!     ├── template      # File template materializer
//!     ├── cluster/      # Cluster object materializer
//!     │   ├── mod       # Cluster trait, create-or-replace
//!     │   ├── kubectl   # kubectl backend
//!     │   └── memory    # In-memory cluster
//!     ├── driver        # Per-environment pipeline
//!     └── report        # Run report
//! ```
//!
//! # Example
//!
//! ```
//! use sluice::core::cluster::MemoryCluster;
//! use sluice::core::config::Config;
//! use sluice::core::driver::Driver;
//! use sluice::core::store::MemoryStore;
//!
//! let config = Config::from_toml(
//!     r#"
//! secrets = "app"
//! environments = ["prod"]
//!
//! [cluster]
//! namespace = "apps"
//! secret_name = "app-secrets"
//!
//! [secret_keys]
//! password = "DB_PASS"
//! "#,
//! )
//! .unwrap();
//!
//! let store = MemoryStore::new().with_text("app/prod", r#"{"DB_PASS":"s3cr3t"}"#);
//! let cluster = MemoryCluster::new();
//!
//! let report = Driver::new(&config, &store).with_cluster(&cluster).run();
//! assert!(report.is_success());
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::config::Config;
pub use crate::core::driver::Driver;
pub use crate::core::report::RunReport;
pub use crate::error::{Error, Result};

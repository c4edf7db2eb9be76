//! Test support utilities for sluice integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;

use base64::Engine;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own temporary project dir and home dir. Child
/// processes use `.current_dir()`, so relative paths in `sluice.toml`
/// resolve inside the project dir and tests can run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with `sluice.toml` written.
    pub fn with_config(config: &str) -> Self {
        let t = Self::new();
        t.write_config(config);
        t
    }

    /// Write `sluice.toml` in the project dir.
    pub fn write_config(&self, config: &str) {
        fs::write(self.dir.path().join("sluice.toml"), config).expect("failed to write config");
    }

    /// Store a text secret in the local store under `secrets/`.
    pub fn write_secret(&self, identifier: &str, payload: &str) {
        let path = self.dir.path().join(STORE_DIR).join(format!("{}.json", identifier));
        write_file(&path, payload);
    }

    /// Store a binary secret (base64 encoded on disk) in the local store.
    pub fn write_binary_secret(&self, identifier: &str, payload: &[u8]) {
        let path = self.dir.path().join(STORE_DIR).join(format!("{}.b64", identifier));
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload);
        write_file(&path, &encoded);
    }

    /// Write a template under `config/`.
    pub fn write_template(&self, name: &str, content: &str) {
        write_file(&self.template_path(name), content);
    }

    /// Path of a template under `config/`.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(TEMPLATE_DIR).join(name)
    }

    /// Path of a template backup under `config/orig/`.
    pub fn backup_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(TEMPLATE_DIR).join("orig").join(name)
    }

    /// Read a template under `config/`.
    pub fn read_template(&self, name: &str) -> String {
        fs::read_to_string(self.template_path(name)).expect("failed to read template")
    }

    /// Read a template backup under `config/orig/`.
    pub fn read_backup(&self, name: &str) -> String {
        fs::read_to_string(self.backup_path(name)).expect("failed to read backup")
    }
}

fn write_file(path: &std::path::Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    fs::write(path, content).expect("failed to write file");
}

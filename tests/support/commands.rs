//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a sluice command with correct environment variables.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - NO_COLOR set so output can be matched literally
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("sluice").expect("failed to find sluice binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("SLUICE_LOG");
        cmd.env_remove("SLUICE_CONFIG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `sluice apply` with extra arguments.
    pub fn apply(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("apply")
            .args(args)
            .output()
            .expect("failed to run sluice apply")
    }

    /// Shortcut for `sluice get <identifier> [--key <key>]`.
    pub fn get(&self, identifier: &str, key: Option<&str>) -> Output {
        let mut cmd = self.cmd();
        cmd.args(["get", identifier]);
        if let Some(key) = key {
            cmd.args(["--key", key]);
        }
        cmd.output().expect("failed to run sluice get")
    }

    /// Shortcut for `sluice check`.
    pub fn check(&self) -> Output {
        self.cmd()
            .arg("check")
            .output()
            .expect("failed to run sluice check")
    }
}

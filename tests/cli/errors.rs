//! Error reporting tests.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_apply_without_config() {
    let t = Test::new();

    let output = t.apply(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "config file not found");
    assert_stderr_contains(&output, "--config");
}

#[test]
fn test_explicit_config_must_exist() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["--config", "nope.toml", "get", "myapp/default"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "config file not found: nope.toml");
}

#[test]
fn test_invalid_toml() {
    let t = Test::with_config("secrets = [");

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid toml config");
}

#[test]
fn test_missing_environments() {
    let t = Test::with_config("secrets = \"myapp\"\nenvironments = []\n");

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required field: environments");
}

#[test]
fn test_flat_yaml_config_via_flag() {
    let t = Test::new();
    std::fs::write(
        t.dir.path().join("secretConfig.yml"),
        r#"
profile: default
configFilePrefix: application
ext: yml
targetPath: config/
region: ap-northeast-2
secrets: myapp
environments:
  - default
store:
  backend: local
  dir: secrets
secretkeys:
  password: DB_PASS
"#,
    )
    .unwrap();
    t.write_secret("myapp/default", PAYLOAD);
    t.write_template("application.yml", TEMPLATE);

    let output = t
        .cmd()
        .args(["-f", "secretConfig.yml", "apply"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.read_template("application.yml").contains("pass: s3cr3t"));
}

#[test]
fn test_unknown_only_value() {
    let t = Test::with_config(FILE_CONFIG);

    let output = t.apply(&["--only", "everything"]);
    assert_failure(&output);
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef sluice"));
}

//! Tests for `sluice check`.

use crate::support::*;

#[test]
fn test_check_lists_targets() {
    let t = Test::with_config(UNREACHABLE_CLUSTER_CONFIG);
    t.write_template("application.yml", TEMPLATE);

    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, "myapp/default");
    assert_stdout_contains(&output, "application.yml");
    assert_stdout_contains(&output, "secret apps/app-secrets");
    assert_stdout_contains(&output, "configmap apps/app-config");
    assert_stdout_contains(&output, "configuration is valid");
}

#[test]
fn test_check_reports_missing_templates() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_template("application.yml", TEMPLATE);

    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, "myapp/staging");
    assert_stdout_contains(&output, "application-staging.yml (template not found)");
    assert_stderr_contains(&output, "1 template(s) missing");
}

#[test]
fn test_check_does_not_fetch() {
    // No secrets written: check must still pass.
    let t = Test::with_config(FILE_CONFIG);

    let output = t.check();
    assert_success(&output);
}

#[test]
fn test_check_without_targets_fails() {
    let t = Test::with_config(
        "secrets = \"myapp\"\nenvironments = [\"default\"]\n[store]\nbackend = \"local\"\ndir = \"secrets\"\n",
    );

    let output = t.check();
    assert_failure(&output);
    assert_stderr_contains(&output, "no targets configured");
}

//! Tests for `sluice apply`.

use crate::support::*;

fn scenario() -> Test {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);
    t.write_secret("myapp/staging", PAYLOAD);
    t.write_template("application.yml", "pass: ${password}");
    t.write_template("application-staging.yml", "pass: ${password}");
    t
}

#[test]
fn test_apply_renders_every_environment() {
    let t = scenario();

    let output = t.apply(&[]);
    assert_success(&output);

    assert_eq!(t.read_template("application.yml"), "pass: s3cr3t\n");
    assert_eq!(t.read_template("application-staging.yml"), "pass: s3cr3t\n");
    assert_eq!(t.read_backup("application.yml"), "pass: ${password}");
    assert_eq!(t.read_backup("application-staging.yml"), "pass: ${password}");

    assert_stdout_contains(&output, "default");
    assert_stdout_contains(&output, "staging");
    assert_stdout_contains(&output, "2 applied, 0 skipped, 0 failed");
}

#[test]
fn test_apply_keeps_layout_and_unresolved_placeholders() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);
    t.write_secret("myapp/staging", PAYLOAD);
    t.write_template(
        "application.yml",
        "spring:\n  datasource:\n    url: ${url}\n    pass: ${password}\n",
    );

    let output = t.apply(&[]);
    assert_success(&output);

    assert_eq!(
        t.read_template("application.yml"),
        "spring:\n  datasource:\n    url: ${url}\n    pass: s3cr3t\n"
    );
    assert_stdout_contains(&output, "1 substituted, 1 unresolved");
}

#[test]
fn test_apply_binary_payload() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_binary_secret("myapp/default", PAYLOAD.as_bytes());
    t.write_secret("myapp/staging", PAYLOAD);
    t.write_template("application.yml", TEMPLATE);

    let output = t.apply(&[]);
    assert_success(&output);
    assert!(t.read_template("application.yml").contains("pass: s3cr3t"));
}

#[test]
fn test_apply_missing_template_is_skipped() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);
    t.write_secret("myapp/staging", PAYLOAD);
    t.write_template("application.yml", TEMPLATE);

    let output = t.apply(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "template not found");
    assert_stdout_contains(&output, "1 applied, 1 skipped, 0 failed");
    assert!(!t.template_path("application-staging.yml").exists());
}

#[test]
fn test_apply_fetch_failure_does_not_stop_other_environments() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/staging", PAYLOAD);
    t.write_template("application.yml", TEMPLATE);
    t.write_template("application-staging.yml", TEMPLATE);

    let output = t.apply(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to fetch secret 'myapp/default'");
    assert_stderr_contains(&output, "1 target(s) failed");

    assert_eq!(t.read_template("application.yml"), TEMPLATE);
    assert!(t
        .read_template("application-staging.yml")
        .contains("pass: s3cr3t"));
}

#[test]
fn test_apply_malformed_payload_leaves_placeholders() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", "not json");
    t.write_secret("myapp/staging", PAYLOAD);
    t.write_template("application.yml", TEMPLATE);

    let output = t.apply(&[]);
    assert_success(&output);
    assert_eq!(t.read_template("application.yml"), TEMPLATE);
    assert!(t.backup_path("application.yml").exists());
}

#[test]
fn test_apply_dry_run_writes_nothing() {
    let t = scenario();

    let output = t.apply(&["--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "would write");
    assert_stdout_contains(&output, "2 previewed");

    assert_eq!(t.read_template("application.yml"), "pass: ${password}");
    assert!(!t.backup_path("application.yml").exists());
}

#[test]
fn test_apply_only_cluster_with_file_config() {
    let t = scenario();

    let output = t.apply(&["--only", "cluster"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no targets selected");
    assert_eq!(t.read_template("application.yml"), "pass: ${password}");
}

#[test]
fn test_apply_unreachable_cluster_fails_cluster_targets_only() {
    let t = Test::with_config(UNREACHABLE_CLUSTER_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);
    t.write_template("application.yml", TEMPLATE);

    let output = t.apply(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "2 target(s) failed");
    assert!(t.read_template("application.yml").contains("pass: s3cr3t"));
}

#[test]
fn test_apply_json_report() {
    let t = Test::with_config(UNREACHABLE_CLUSTER_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);
    t.write_template("application.yml", TEMPLATE);

    let output = t.apply(&["--json"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "2 target(s) failed");
    assert_stderr_contains(&output, "rerun with --verbose");

    let report = stdout_json(&output);
    let env = &report["environments"][0];
    assert_eq!(env["environment"], "default");
    assert_eq!(env["identifier"], "myapp/default");
    assert_eq!(env["fetch"]["status"], "fetched");
    assert_eq!(env["fetch"]["keys"], 2);

    let targets = env["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0]["kind"], "file");
    assert_eq!(targets[0]["outcome"]["status"], "done");
    assert_eq!(targets[1]["kind"], "cluster-secret");
    assert_eq!(targets[1]["location"], "apps/app-secrets");
    assert_eq!(targets[1]["outcome"]["status"], "failed");
    assert!(targets[1]["outcome"]["reason"]
        .as_str()
        .unwrap()
        .contains("cannot reach cluster"));
    assert_eq!(targets[2]["kind"], "cluster-config");
}

#[test]
fn test_apply_dry_run_cluster_needs_no_connection() {
    let t = Test::with_config(UNREACHABLE_CLUSTER_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);

    let output = t.apply(&["--dry-run", "--only", "cluster"]);
    assert_success(&output);
    assert_stdout_contains(&output, "would apply 1 keys");
}

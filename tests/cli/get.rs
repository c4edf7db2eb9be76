//! Tests for `sluice get`.

use crate::support::*;

#[test]
fn test_get_prints_payload() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);

    let output = t.get("myapp/default", None);
    assert_success(&output);
    assert_stdout_contains(&output, PAYLOAD);
}

#[test]
fn test_get_single_key() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);

    let output = t.get("myapp/default", Some("DB_PASS"));
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "s3cr3t");
}

#[test]
fn test_get_coerces_scalars() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", r#"{"PORT":5432,"DEBUG":false}"#);

    let output = t.get("myapp/default", Some("PORT"));
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "5432");

    let output = t.get("myapp/default", Some("DEBUG"));
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "false");
}

#[test]
fn test_get_binary_payload() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_binary_secret("myapp/default", PAYLOAD.as_bytes());

    let output = t.get("myapp/default", Some("API_KEY"));
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "abc123");
}

#[test]
fn test_get_missing_key_lists_available() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", PAYLOAD);

    let output = t.get("myapp/default", Some("NOPE"));
    assert_failure(&output);
    assert_stderr_contains(&output, "key not found in secret: NOPE");
    assert_stderr_contains(&output, "available: API_KEY, DB_PASS");
}

#[test]
fn test_get_nested_value_is_rejected() {
    let t = Test::with_config(FILE_CONFIG);
    t.write_secret("myapp/default", r#"{"HOSTS":["a","b"]}"#);

    let output = t.get("myapp/default", Some("HOSTS"));
    assert_failure(&output);
    assert_stderr_contains(&output, "not a scalar");
}

#[test]
fn test_get_missing_secret() {
    let t = Test::with_config(FILE_CONFIG);

    let output = t.get("myapp/prod", None);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to fetch secret 'myapp/prod'");
}

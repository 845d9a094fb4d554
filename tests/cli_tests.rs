//! CLI error and smoke tests against the built binary

use std::process::Command;

fn voice_ledger_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voice-ledger"))
}

#[test]
fn record_without_api_keys_fails_fast() {
    let output = voice_ledger_bin()
        .arg("record")
        .env_remove("GOOGLE_STT_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env("HOME", "/nonexistent") // Prevent reading config file
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("API key") || stderr.contains("api_key"),
        "Expected error about missing API key, got: {}",
        stderr
    );
}

#[test]
fn config_get_unknown_key() {
    let output = voice_ledger_bin()
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let output = voice_ledger_bin()
        .args(["config", "set", "unknown_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_sample_rate() {
    let output = voice_ledger_bin()
        .args(["config", "set", "sample_rate", "fast"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("sample rate") || stderr.contains("sample_rate"),
        "Expected error about invalid sample rate, got: {}",
        stderr
    );
}

#[test]
fn config_list_with_no_file() {
    let output = voice_ledger_bin()
        .args(["config", "list"])
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    // Should succeed with values shown as "(not set)"
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set") || stdout.contains("stt_api_key"),
        "Expected config list output, got: {}",
        stdout
    );
}

#[test]
fn list_on_fresh_database_reports_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("records.db");

    let output = voice_ledger_bin()
        .args(["list", "--db", db.to_str().unwrap()])
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No records"),
        "Expected 'No records', got: {}",
        stderr
    );
}

#[test]
fn delete_unknown_id_succeeds_with_zero_affected() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("records.db");

    let output = voice_ledger_bin()
        .args(["delete", "12345", "--db", db.to_str().unwrap()])
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Deleted 0"),
        "Expected zero deletions reported, got: {}",
        stderr
    );
}

#[test]
fn analyze_on_fresh_database_reports_nothing_to_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("records.db");

    let output = voice_ledger_bin()
        .args(["analyze", "--db", db.to_str().unwrap()])
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No records to analyze"),
        "Expected empty-analysis message, got: {}",
        stdout
    );
}

#[test]
fn clear_on_fresh_database_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("records.db");

    let output = voice_ledger_bin()
        .args(["clear", "--db", db.to_str().unwrap()])
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Ledger cleared"),
        "Expected clear confirmation, got: {}",
        stderr
    );
}

#[test]
fn delete_requires_an_id() {
    let output = voice_ledger_bin()
        .arg("delete")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

//! Smoke tests that drive the built binary the way a user would. Everything
//! here must work offline: no command in this file reaches the backend.

use std::process::{Command, Output};

fn run_quill(data_dir: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quill"))
        .args(args)
        .env("QUILL_DATA_DIR", data_dir)
        .env_remove("QUILL_API_KEY")
        .output()
        .expect("run quill binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_the_commands() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_quill(tmp.path(), &["help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("generate <topic>"));
    assert!(text.contains("history"));
    assert!(text.contains("key set"));
    assert!(text.contains("serve"));
}

#[test]
fn no_arguments_also_prints_help() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_quill(tmp.path(), &[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("generate <topic>"));
}

#[test]
fn fresh_history_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_quill(tmp.path(), &["history"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("History is empty"));
}

#[test]
fn key_show_reports_missing_configuration() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_quill(tmp.path(), &["key", "show"]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stderr).into_owned() + &stdout(&output);
    assert!(text.contains("No credential configured"));
}

#[test]
fn key_set_and_clear_round_trip() {
    let tmp = tempfile::tempdir().unwrap();

    let output = run_quill(tmp.path(), &["key", "set", "smoke-test-key-1234"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Credential stored"));

    let output = run_quill(tmp.path(), &["key", "show"]);
    let text = stdout(&output);
    assert!(text.contains("1234"));
    assert!(!text.contains("smoke-test-key"));

    let output = run_quill(tmp.path(), &["key", "clear"]);
    assert!(stdout(&output).contains("Credential override removed"));
}

#[test]
fn generate_without_credential_fails_with_guidance() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_quill(tmp.path(), &["generate", "Some Topic"]);
    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("No API credential configured"));
}

#[test]
fn generate_without_topic_shows_usage() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_quill(tmp.path(), &["generate"]);
    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("Usage: quill generate"));
}

#[test]
fn unknown_history_id_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_quill(tmp.path(), &["history", "show", "42"]);
    assert!(output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("No report with id 42"));
}

//! Ensure CLI command failures honor `--output json`.

mod common;

use common::{fixture, mt940_cmd, stdout_json, write_temp};

#[test]
fn parse_missing_file_emits_json_error_envelope() {
    let output = mt940_cmd()
        .args(["parse", "nope-does-not-exist.sta", "--output", "json"])
        .output()
        .expect("run parse command");

    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "command_failed");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("failed to read 'nope-does-not-exist.sta'")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn check_missing_tables_path_emits_json_error_envelope() {
    let output = mt940_cmd()
        .args([
            "check",
            &fixture("ok-simple.sta"),
            "--currencies",
            "missing-currencies.json",
            "--output",
            "json",
        ])
        .output()
        .expect("run check command");

    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "command_failed");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("tables file")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn malformed_currency_table_emits_json_error_envelope() {
    let (_dir, tables) = write_temp("currencies.json", "{ not json");
    let output = mt940_cmd()
        .args([
            "check",
            &fixture("ok-simple.sta"),
            "--currencies",
            &tables,
            "--output",
            "json",
        ])
        .output()
        .expect("run check command");

    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["error"], "command_failed");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("failed to load currency table")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn csv_missing_file_emits_pretty_error() {
    let output = mt940_cmd()
        .args(["csv", "missing-file.sta", "--output", "pretty"])
        .output()
        .expect("run csv command");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: failed to read"), "unexpected stderr: {stderr}");
}

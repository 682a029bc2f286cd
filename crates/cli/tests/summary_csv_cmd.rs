//! CLI tests for `mt940 summary` and `mt940 csv`.

mod common;

use common::{fixture, mt940_cmd, statement_with_currency, stdout_json, write_temp};

#[test]
fn summary_pretty_lists_fields() {
    let output = mt940_cmd()
        .args(["summary", &fixture("ok-simple.sta"), "--output", "pretty"])
        .output()
        .expect("run summary command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "transaction ref no: REF1");
    assert_eq!(lines[1], "account identification: ACC1");
    assert_eq!(lines[3], "opening balance: C 230101 100,00 EUR");
    assert!(lines[4].starts_with("statement: value date: 230102;"));
    assert_eq!(lines[5], "closing balance: C 230102 50,00 EUR");
}

#[test]
fn summary_json_wraps_text() {
    let output = mt940_cmd()
        .args(["summary", &fixture("ok-simple.sta"), "--output", "json"])
        .output()
        .expect("run summary command");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert!(
        json["summary"]
            .as_str()
            .is_some_and(|s| s.starts_with("transaction ref no: REF1\n"))
    );
}

#[test]
fn summary_of_invalid_statement_fails() {
    let (_dir, path) = write_temp("bad.sta", &statement_with_currency("XXX"));
    let output = mt940_cmd()
        .args(["summary", &path, "--output", "json"])
        .output()
        .expect("run summary command");

    assert!(!output.status.success());
    assert_eq!(stdout_json(&output)[0]["id"], "MT9303");
}

#[test]
fn csv_one_row_per_statement_line() {
    let output = mt940_cmd()
        .args(["csv", &fixture("ok-simple.sta"), &fixture("ok-full.sta")])
        .output()
        .expect("run csv command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert!(lines[0].starts_with("tag20,tag21,tag25_account,"));
    // One line in ok-simple, three in ok-full.
    assert_eq!(lines.len(), 1 + 1 + 3);
    assert!(lines[1].starts_with("REF1,,ACC1,"));
}

#[test]
fn csv_warns_about_messages_without_statement_lines() {
    let output = mt940_cmd()
        .args(["csv", &fixture("ok-no-statements.sta"), "--output", "json"])
        .output()
        .expect("run csv command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "only the header: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[MT9401]"), "unexpected stderr: {stderr}");
}

#[test]
fn csv_stops_at_first_invalid_file() {
    let (_dir, path) = write_temp("bad.sta", &statement_with_currency("XXX"));
    let output = mt940_cmd()
        .args(["csv", &fixture("ok-simple.sta"), &path, "--output", "pretty"])
        .output()
        .expect("run csv command");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("MT9303"), "unexpected stderr: {stderr}");
}

#[test]
fn csv_requires_a_file() {
    let output = mt940_cmd().args(["csv"]).output().expect("run csv command");
    assert!(!output.status.success());
}

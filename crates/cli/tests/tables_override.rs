//! CLI tests for `--currencies` and `--sic-codes`.

mod common;

use common::{mt940_cmd, statement_with_currency, statement_with_ident, stdout_json, write_temp};

#[test]
fn custom_currency_table_replaces_bundled_one() {
    let (_dir, path) = write_temp("stmt.sta", &statement_with_currency("XTS"));
    let (_tdir, tables) = write_temp(
        "currencies.json",
        r#"[{"code": "XTS", "number": 963, "minor_units": 0},
            {"code": "EUR", "number": 978, "minor_units": 2}]"#,
    );

    let output = mt940_cmd()
        .args(["check", &path, "--output", "json"])
        .output()
        .expect("run check command");
    assert!(!output.status.success());

    let output = mt940_cmd()
        .args(["check", &path, "--currencies", &tables, "--output", "json"])
        .output()
        .expect("run check command");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["ok"], true);
}

#[test]
fn custom_identification_codes_replace_bundled_ones() {
    let (_dir, path) = write_temp("stmt.sta", &statement_with_ident("NXYZ"));
    let (_tdir, codes) = write_temp("codes.csv", "XYZ,In-house transfer\n");

    let output = mt940_cmd()
        .args(["check", &path, "--output", "json"])
        .output()
        .expect("run check command");
    assert!(!output.status.success());
    assert_eq!(stdout_json(&output)["diagnostics"][0]["id"], "MT9302");

    let output = mt940_cmd()
        .args(["check", &path, "--sic-codes", &codes, "--output", "json"])
        .output()
        .expect("run check command");
    assert!(output.status.success());
}

#[test]
fn trace_flag_logs_to_stderr_only() {
    let (_dir, path) = write_temp("stmt.sta", &statement_with_currency("EUR"));
    let output = mt940_cmd()
        .args(["parse", &path, "--trace", "--output", "json"])
        .output()
        .expect("run parse command");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["message"]["tag20"], "REF1");
    assert!(!output.stderr.is_empty());
}

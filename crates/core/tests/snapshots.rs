//! Golden snapshot tests for message JSON and diagnostic output.
//!
//! These tests capture the serialized tree for every statement under
//! `tests/fixtures/`. If the output changes, the test fails and the developer
//! must review the diff and explicitly accept it.
//!
//! To regenerate golden files after intentional changes:
//!
//! ```sh
//! UPDATE_GOLDEN=1 cargo test -p mt9x_core golden
//! ```

mod common;

use std::path::PathBuf;

use common::{TABLES, fixture, fixture_names};
use mt9x_core::{parse_and_validate, to_pretty_json};

fn golden_dir() -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("golden");
    p
}

/// Compare `actual` against a golden file.
///
/// * If `UPDATE_GOLDEN` env var is set, writes (or overwrites) the golden file.
/// * Otherwise, reads the golden file and asserts equality.
fn assert_golden(name: &str, actual: &str) {
    let path = golden_dir().join(format!("{}.json", name));

    if std::env::var("UPDATE_GOLDEN")
        .ok()
        .filter(|v| !v.is_empty() && v != "0" && v != "false")
        .is_some()
    {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, actual).unwrap();
        eprintln!("Updated golden file: {}", path.display());
        return;
    }

    let expected = std::fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!(
            "Golden file not found: {}\nRun with UPDATE_GOLDEN=1 to create it.",
            path.display()
        )
    });
    assert_eq!(
        actual.trim(),
        expected.trim(),
        "Snapshot mismatch for '{}'. Run with UPDATE_GOLDEN=1 to update.",
        name
    );
}

fn snapshot_fixture(file: &str) {
    let msg = parse_and_validate(&fixture(file), &TABLES)
        .unwrap_or_else(|e| panic!("{file}: {e}"));
    let name = file.trim_end_matches(".sta");
    assert_golden(name, &to_pretty_json(&msg));
}

// ─── Snapshot Tests ─────────────────────────────────────────────────────────

#[test]
fn golden_simple_statement() {
    snapshot_fixture("ok-simple.sta");
}

#[test]
fn golden_full_statement() {
    snapshot_fixture("ok-full.sta");
}

#[test]
fn golden_statement_without_lines() {
    snapshot_fixture("ok-no-statements.sta");
}

#[test]
fn golden_intermediate_chf_statement() {
    snapshot_fixture("ok-intermediate-chf.sta");
}

#[test]
fn golden_every_fixture_has_a_snapshot() {
    for file in fixture_names() {
        let name = file.trim_end_matches(".sta");
        assert!(
            golden_dir().join(format!("{name}.json")).exists(),
            "missing golden file for {file}"
        );
    }
}

#[test]
fn golden_currency_diagnostic() {
    let input = common::with_currencies("XXX", "EUR", None);
    let diag = parse_and_validate(&input, &TABLES)
        .unwrap_err()
        .to_diagnostic();
    assert_golden(
        "diag-bad-currency",
        &serde_json::to_string_pretty(&diag).unwrap(),
    );
}

#[test]
fn golden_json_round_trips_through_serde() {
    let msg = parse_and_validate(&fixture("ok-full.sta"), &TABLES).unwrap();
    let json = to_pretty_json(&msg);
    let back: mt9x_core::Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back, msg);
}

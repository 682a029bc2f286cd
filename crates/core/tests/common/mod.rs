//! Shared test helpers for `mt9x_core` integration tests.

#![allow(unreachable_pub)]

use std::path::PathBuf;
use std::sync::LazyLock;

use mt9x_core::ReferenceTables;

/// Bundled reference tables, loaded once per test binary.
pub static TABLES: LazyLock<ReferenceTables> =
    LazyLock::new(|| ReferenceTables::embedded().expect("bundled reference tables must load"));

/// The end-to-end message: one debit statement line, EUR balances.
#[allow(dead_code)]
pub const SIMPLE: &str = ":20:REF1\r\n\
:25:ACC1\r\n\
:28C:1\r\n\
:60F:C230101EUR100,00\r\n\
:61:230102D50,00NMSCINV-2023-01\r\n\
:62F:C230102EUR50,00\r\n";

// ─── Message builders ────────────────────────────────────────────────────────

/// A complete message with the given `:20:` reference.
#[allow(dead_code)]
pub fn with_reference(reference: &str) -> String {
    format!(
        ":20:{reference}\r\n:25:ACC1\r\n:28C:1\r\n:60F:C230101EUR100,00\r\n:62F:C230101EUR100,00\r\n"
    )
}

/// A complete message whose only statement line has the given body.
#[allow(dead_code)]
pub fn with_statement_line(line: &str) -> String {
    format!(
        ":20:REF1\r\n:25:ACC1\r\n:28C:1\r\n:60F:C230101EUR100,00\r\n:61:{line}\r\n:62F:C230102EUR50,00\r\n"
    )
}

/// A complete message with the given opening, closing and optional `:64:`
/// currencies.
#[allow(dead_code)]
pub fn with_currencies(opening: &str, closing: &str, available: Option<&str>) -> String {
    let mut msg = format!(
        ":20:REF1\r\n:25:ACC1\r\n:28C:1\r\n:60F:C230101{opening}100,00\r\n:62F:C230101{closing}100,00\r\n"
    );
    if let Some(cur) = available {
        msg.push_str(&format!(":64:C230101{cur}100,00\r\n"));
    }
    msg
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Read a fixture from `tests/fixtures/`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

/// Names of all `.sta` fixtures, sorted.
#[allow(dead_code)]
pub fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(fixtures_dir())
        .expect("fixtures directory")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".sta"))
        .collect();
    names.sort();
    names
}

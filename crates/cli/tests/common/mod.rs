//! Shared helpers for `mt940` CLI integration tests.

#![allow(unreachable_pub, dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::cargo;

/// The end-to-end message with the given opening balance currency.
pub fn statement_with_currency(currency: &str) -> String {
    format!(
        ":20:REF1\r\n:25:ACC1\r\n:28C:1\r\n:60F:C230101{currency}100,00\r\n\
         :61:230102D50,00NMSCINV-2023-01\r\n:62F:C230102EUR50,00\r\n"
    )
}

/// The end-to-end message with the given transaction type on its statement line.
pub fn statement_with_ident(ident: &str) -> String {
    format!(
        ":20:REF1\r\n:25:ACC1\r\n:28C:1\r\n:60F:C230101EUR100,00\r\n\
         :61:230102D50,00{ident}INV-2023-01\r\n:62F:C230102EUR50,00\r\n"
    )
}

pub fn mt940_cmd() -> Command {
    Command::new(cargo::cargo_bin!("mt940"))
}

/// Write `content` to a file in a fresh temp dir; keep the dir alive while the path is used.
pub fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write temp file");
    (dir, path.to_string_lossy().to_string())
}

/// Path of a sample statement shared with the core crate's tests.
pub fn fixture(name: &str) -> String {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.extend(["..", "core", "tests", "fixtures", name]);
    p.to_string_lossy().to_string()
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

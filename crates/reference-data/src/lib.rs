//! Reference data tables for MT940 network validated rules.
//!
//! Two read-only lookups back the validator: the ISO 4217 currency table
//! (balance currencies, rule T52) and the MT940 statement identification code
//! table (the `N`/`F` transaction types of a `:61:` statement line). Both are
//! bundled into the crate and loaded once; callers may also load replacement
//! tables from their own JSON/CSV text.
//!
//! The validator only depends on the [`CurrencyLookup`] and
//! [`StatementIdentLookup`] traits, so tests and embedders can supply their
//! own tables.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Bundled ISO 4217 table (JSON array of [`CurrencyEntry`]).
pub const EMBEDDED_CURRENCIES_JSON: &str = include_str!("../data/iso4217.json");

/// Bundled MT940 statement identification codes (CSV `code,description`, no header).
pub const EMBEDDED_SIC_CSV: &str = include_str!("../data/mt940_sic.csv");

// ─── Lookup traits ──────────────────────────────────────────────────────────

/// Read-only view of the valid currency codes.
pub trait CurrencyLookup {
    /// Returns `true` if `code` is a registered three-letter currency code.
    fn contains_currency(&self, code: &str) -> bool;
}

/// Read-only view of the registered statement identification codes.
pub trait StatementIdentLookup {
    /// Returns `true` if the three-character `code` is registered.
    fn is_proper_code(&self, code: &str) -> bool;
}

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Failure to load a reference table.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The currency table JSON could not be decoded.
    #[error("failed to parse currency data: {0}")]
    Currencies(#[source] serde_json::Error),

    /// The statement identification CSV could not be read.
    #[error("failed to parse identification data: {0}")]
    StatementIdentCodes(#[source] csv::Error),

    /// A table row is structurally valid but its content is not.
    #[error("invalid {table} entry at row {row}: {reason}")]
    InvalidEntry {
        /// Which table the row belongs to.
        table: &'static str,
        /// 1-based row number.
        row: usize,
        /// What is wrong with the row.
        reason: String,
    },
}

// ─── Currency table ─────────────────────────────────────────────────────────

/// One row of the ISO 4217 table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyEntry {
    /// Alphabetic code, e.g. `"EUR"`.
    pub code: String,
    /// Numeric code, e.g. `978`.
    pub number: u16,
    /// Number of digits after the decimal separator.
    pub minor_units: u8,
}

/// ISO 4217 currency table.
#[derive(Debug, Default)]
pub struct CurrencyTable {
    entries: Vec<CurrencyEntry>,
    code_set_cache: OnceLock<HashSet<String>>,
}

impl CurrencyTable {
    /// Create a table from explicit entries (table order is preserved).
    pub fn new(entries: Vec<CurrencyEntry>) -> Self {
        Self {
            entries,
            code_set_cache: OnceLock::new(),
        }
    }

    /// Build a table that only knows the given codes. Numeric code and minor
    /// units are left at zero.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            codes
                .into_iter()
                .map(|code| CurrencyEntry {
                    code: code.into(),
                    number: 0,
                    minor_units: 0,
                })
                .collect(),
        )
    }

    /// Parse a JSON array of [`CurrencyEntry`] objects.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let entries: Vec<CurrencyEntry> =
            serde_json::from_str(json).map_err(TableError::Currencies)?;
        for (i, e) in entries.iter().enumerate() {
            if e.code.len() != 3 || !e.code.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(TableError::InvalidEntry {
                    table: "currency",
                    row: i + 1,
                    reason: format!("code {:?} is not three uppercase letters", e.code),
                });
            }
        }
        Ok(Self::new(entries))
    }

    /// Load the table bundled with this crate.
    pub fn embedded() -> Result<Self, TableError> {
        Self::from_json(EMBEDDED_CURRENCIES_JSON)
    }

    /// All valid currency codes, in table order.
    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.code.as_str()).collect()
    }

    /// All table rows.
    pub fn entries(&self) -> &[CurrencyEntry] {
        &self.entries
    }

    /// Look up a row by alphabetic code.
    pub fn get(&self, code: &str) -> Option<&CurrencyEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    /// Returns `true` if `code` is in the table.
    pub fn contains(&self, code: &str) -> bool {
        self.code_set().contains(code)
    }

    /// Returns a cached set of all codes, built on first access.
    fn code_set(&self) -> &HashSet<String> {
        self.code_set_cache
            .get_or_init(|| self.entries.iter().map(|e| e.code.clone()).collect())
    }
}

impl CurrencyLookup for CurrencyTable {
    fn contains_currency(&self, code: &str) -> bool {
        self.contains(code)
    }
}

// ─── Statement identification codes ─────────────────────────────────────────

/// MT940 statement identification codes (`:61:` subfield 6, after `N`/`F`).
#[derive(Debug, Clone, Default)]
pub struct StatementIdentCodes {
    codes: BTreeMap<String, String>,
}

impl StatementIdentCodes {
    /// Create a table from `(code, description)` pairs.
    pub fn new<I, K, V>(codes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse headerless `code,description` CSV.
    pub fn from_csv(text: &str) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut codes = BTreeMap::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(TableError::StatementIdentCodes)?;
            let code = record.get(0).unwrap_or_default();
            if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(TableError::InvalidEntry {
                    table: "statement identification code",
                    row: i + 1,
                    reason: format!("code {code:?} is not three alphanumeric characters"),
                });
            }
            let description = record.get(1).unwrap_or_default();
            codes.insert(code.to_string(), description.to_string());
        }
        Ok(Self { codes })
    }

    /// Load the table bundled with this crate.
    pub fn embedded() -> Result<Self, TableError> {
        Self::from_csv(EMBEDDED_SIC_CSV)
    }

    /// Human-readable description of a code.
    pub fn description(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no codes are registered.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl StatementIdentLookup for StatementIdentCodes {
    fn is_proper_code(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }
}

// ─── Bundle ─────────────────────────────────────────────────────────────────

/// The two lookup tables the validator needs, loaded once and shared read-only.
#[derive(Debug, Default)]
pub struct ReferenceTables {
    /// ISO 4217 currencies.
    pub currencies: CurrencyTable,
    /// MT940 statement identification codes.
    pub statement_ident_codes: StatementIdentCodes,
}

impl ReferenceTables {
    /// Bundle explicit tables.
    pub fn new(currencies: CurrencyTable, statement_ident_codes: StatementIdentCodes) -> Self {
        Self {
            currencies,
            statement_ident_codes,
        }
    }

    /// Load both bundled tables.
    pub fn embedded() -> Result<Self, TableError> {
        Ok(Self::new(
            CurrencyTable::embedded()?,
            StatementIdentCodes::embedded()?,
        ))
    }
}

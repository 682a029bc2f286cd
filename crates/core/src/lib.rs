//! SWIFT MT940 statement toolchain core library.
//!
//! Provides lexing, grammar matching, typed capture and validation of MT940
//! customer statement messages. The main entry points are [`parse_str`] for
//! parsing, [`parse_and_validate`] for parsing plus the network validated
//! rules, and [`MessageParser`] for configured parsing.

#![warn(missing_docs)]

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
///
/// ```ignore
/// ctx!("tag" => "20", "value" => reference)
/// ```
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Root error type.
pub mod error;
/// CSV export.
pub mod export;
/// MT940 grammar: lexer, engine, typed captures, AST, and parser.
pub mod grammar;
/// Network validated rules.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Errors
pub use error::Error;

// Parser
pub use grammar::parser::{
    MessageParser, ParseOptions, parse_and_validate, parse_bytes, parse_str,
};

// AST
pub use grammar::ast::{
    AccountIdent, Balance, DebitCredit, Message, Statement, StatementNumber, StatementSection,
};

// Typed captures
pub use grammar::capture::{CaptureError, CommaDecimal, FourDigitDate, SixDigitDate};

// Validator
pub use validate::{BalanceField, ValidationError, validate, validate_with_tables};

// Reference data (re-exported from the reference-data crate)
pub use mt9x_reference_data::{
    CurrencyLookup, CurrencyTable, ReferenceTables, StatementIdentCodes, StatementIdentLookup,
    TableError,
};

// Diagnostics (re-exported from the diagnostics crate)
pub use mt9x_diagnostics::{Diagnostic, Severity, Span, codes};

// Serialization helpers
pub use export::{CSV_HEADER, to_csv_string, write_csv};
pub use grammar::dump::{to_json_value, to_pretty_json};

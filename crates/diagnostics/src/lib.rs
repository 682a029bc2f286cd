//! Diagnostics for the MT9x toolchain.
//!
//! Provides the [`Diagnostic`], [`Severity`] and [`Span`] types used to
//! report failures from the lexer, grammar engine, typed captures and
//! validator. Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants and their explanations.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the input is invalid.
    Error,
    /// Warning: the input is valid but a consumer may not get what it expects.
    Warn,
}

/// Byte span in the source input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// A diagnostic message produced by the lexer, parser, or validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"MT9301"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source input that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    /// Absent when no context is applicable. Serialized only when present.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Context is a set of key-value string pairs providing structured details
    /// about the diagnostic for tooling, filtering, and programmatic consumption.
    /// Keys are short descriptors like `"state"`, `"field"`, `"value"`, etc.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    codes::EXPLANATIONS
        .iter()
        .find(|(code, _)| *code == id)
        .map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Span ────────────────────────────────────────────────────────────

    #[test]
    fn span_empty() {
        let s = Span::empty(7);
        assert_eq!(s.start, 7);
        assert_eq!(s.end, 7);
    }

    #[test]
    #[should_panic(expected = "Span end (3) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 3);
    }

    // ── Diagnostic ──────────────────────────────────────────────────────

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(codes::BAD_CURRENCY, "bad currency code: XXX", None);
        assert_eq!(format!("{}", d), "error[MT9303]: bad currency code: XXX");
    }

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
    }

    #[test]
    fn diagnostic_warn_constructor() {
        let d = Diagnostic::warn(codes::NO_STATEMENT_LINES, "no rows", Some(Span::new(0, 5)));
        assert_eq!(d.severity, Severity::Warn);
        assert_eq!(d.span, Some(Span::new(0, 5)));
    }

    #[test]
    fn diagnostic_explain_known() {
        let d = Diagnostic::error(codes::BAD_REFERENCE, "test", None);
        assert!(d.explain().unwrap().contains("slash"));
    }

    #[test]
    fn diagnostic_explain_unknown() {
        let d = Diagnostic::error("UNKNOWN_CODE", "test", None);
        assert!(d.explain().is_none());
    }

    #[test]
    fn all_codes_have_explanations() {
        let all = [
            codes::LEX_UNRECOGNIZED_INPUT,
            codes::LEX_STATE_UNDERFLOW,
            codes::INVALID_ENCODING,
            codes::SYNTAX_UNEXPECTED_TOKEN,
            codes::SYNTAX_TRAILING_INPUT,
            codes::GRAMMAR_MISSING_CAPTURE,
            codes::CAPTURE_INVALID_DATE,
            codes::CAPTURE_INVALID_AMOUNT,
            codes::BAD_REFERENCE,
            codes::BAD_TRANSACTION_IDENT,
            codes::BAD_CURRENCY,
            codes::NO_STATEMENT_LINES,
        ];
        for code in &all {
            assert!(
                explain(code).is_some(),
                "diagnostic code {code} has no explain() entry"
            );
        }
        assert_eq!(all.len(), codes::EXPLANATIONS.len());
    }

    #[test]
    fn diagnostic_serde_omits_none_span_and_context() {
        let d = Diagnostic::error(codes::BAD_REFERENCE, "test", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("span"), "None span should be omitted: {json}");
        assert!(
            !json.contains("context"),
            "None context should be omitted: {json}"
        );
    }

    #[test]
    fn diagnostic_context_serde_roundtrip() {
        let d = Diagnostic::error(codes::SYNTAX_UNEXPECTED_TOKEN, "unexpected", Some(Span::new(0, 5)))
            .with_context(BTreeMap::from([
                ("expected".into(), ":62F: | :62M:".into()),
                ("found".into(), "end of input".into()),
            ]));
        let json = serde_json::to_string(&d).unwrap();
        let d2: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, d2);
        let e_pos = json.find("expected").unwrap();
        let f_pos = json.find("found").unwrap();
        assert!(e_pos < f_pos, "context keys should serialize sorted: {json}");
    }
}

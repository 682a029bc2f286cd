//! Lexical categories of MT9x fields, as regular-expression sources.
//!
//! Character sets follow the SWIFT "x" set. Some banks are not strict about
//! it, so the free-text classes are the slightly wider "z"-like variant that
//! also admits `= " % & * < > ; @ # _`.

use regex::Regex;

/// One character of the SWIFT X character set (widened).
pub const CHAR_X: &str = r#"[a-zA-Z0-9/\-?:().,'+ ="%&*<>;@#_]"#;

/// [`CHAR_X`] without the forward slash.
pub const CHAR_X_NO_SLASH: &str = r#"[a-zA-Z0-9\-?:().,'+ ="%&*<>;@#_]"#;

/// Free text: anything but a tag-opening colon, then X characters.
pub const FREE_TEXT: &str = r#"[^:][a-zA-Z0-9/\-?:().,'+ ="%&*<>;@#_]+"#;

/// Slash-restricted free text used for references: single slashes may
/// separate segments, but the text never starts a segment with a slash,
/// ends with one, or contains `//`.
pub const REFERENCE: &str = r#"[^:/][a-zA-Z0-9\-?:().,'+ ="%&*<>;@#_]+(?:/[a-zA-Z0-9\-?:().,'+ ="%&*<>;@#_]+)*"#;

/// A run of digits.
pub const NUMERIC_SEQ: &str = "[0-9]+";

/// `YYMMDD`.
pub const DATE6: &str = "[0-9]{6}";

/// `MMDD`.
pub const DATE4: &str = "[0-9]{4}";

/// ISO 4217 alphabetic currency code shape.
pub const CURRENCY: &str = "[A-Z]{3}";

/// Comma-decimal amount. The standard mandates the comma; amounts without
/// it are accepted because real statements omit it.
pub const AMOUNT: &str = "[0-9]+(?:,[0-9]*)?";

/// Balance debit/credit mark.
pub const DC_MARK: &str = "[DC]";

/// Statement line debit/credit mark, optionally reversed.
pub const RDC_MARK: &str = "R?[DC]";

/// Third character of the currency code, used as funds code on statement lines.
pub const FUNDS_CODE: &str = "[A-Z]";

/// Transaction type identification code.
pub const TRANS_IDENT: &str = "(?:S[0-9]{3}|[NF][A-Z0-9]{3})";

/// MT9x line terminator.
pub const CRLF: &str = "\r\n";

/// Compile `pattern` so that it only matches at the start of the haystack.
///
/// Panics if the pattern is invalid; every caller passes one of the
/// constants above or an escaped literal.
pub(crate) fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})"))
        .unwrap_or_else(|e| panic!("invalid lexer pattern {pattern:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_match(pattern: &str, text: &str) -> bool {
        anchored(pattern)
            .find(text)
            .is_some_and(|m| m.end() == text.len())
    }

    #[test]
    fn composite_classes_are_built_from_char_sets() {
        assert_eq!(FREE_TEXT, format!("[^:]{CHAR_X}+"));
        assert_eq!(
            REFERENCE,
            format!("[^:/]{CHAR_X_NO_SLASH}+(?:/{CHAR_X_NO_SLASH}+)*")
        );
    }

    #[test]
    fn free_text_rejects_leading_colon() {
        assert!(full_match(FREE_TEXT, "REF1"));
        assert!(full_match(FREE_TEXT, "/ORDP/ACME LTD"));
        assert!(!full_match(FREE_TEXT, ":20:"));
    }

    #[test]
    fn free_text_needs_two_characters() {
        assert!(!full_match(FREE_TEXT, "A"));
        assert!(full_match(FREE_TEXT, "AB"));
    }

    #[test]
    fn reference_stops_before_double_slash() {
        let re = anchored(REFERENCE);
        assert_eq!(re.find("NONREF//BANK").unwrap().as_str(), "NONREF");
        assert_eq!(re.find("AB/CD//X").unwrap().as_str(), "AB/CD");
        assert_eq!(re.find("AB/").unwrap().as_str(), "AB");
    }

    #[test]
    fn reference_never_starts_with_slash() {
        assert!(anchored(REFERENCE).find("/OWN").is_none());
        assert!(anchored(REFERENCE).find("//INST").is_none());
        assert!(full_match(REFERENCE, "OWN/REF"));
    }

    #[test]
    fn amount_accepts_missing_fraction() {
        assert!(full_match(AMOUNT, "50,00"));
        assert!(full_match(AMOUNT, "50,"));
        assert!(full_match(AMOUNT, "50"));
        assert!(!full_match(AMOUNT, ",50"));
        assert!(!full_match(AMOUNT, "50.00"));
    }

    #[test]
    fn trans_ident_shapes() {
        assert!(full_match(TRANS_IDENT, "S103"));
        assert!(full_match(TRANS_IDENT, "NMSC"));
        assert!(full_match(TRANS_IDENT, "FCHG"));
        assert!(!full_match(TRANS_IDENT, "S1A3"));
        assert!(!full_match(TRANS_IDENT, "QABC"));
    }

    #[test]
    fn rdc_mark_prefers_reversed() {
        assert_eq!(anchored(RDC_MARK).find("RD50").unwrap().as_str(), "RD");
        assert_eq!(anchored(RDC_MARK).find("C50").unwrap().as_str(), "C");
    }
}

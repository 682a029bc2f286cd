//! Diagnostic ID constants.
//!
//! Use these instead of string literals so that a typo is a compile error.
//! Every code listed here has an entry in [`EXPLANATIONS`].

/// No lexer rule in the active state matches the input.
pub const LEX_UNRECOGNIZED_INPUT: &str = "MT9001";
/// A lexer rule tried to pop the last remaining state.
pub const LEX_STATE_UNDERFLOW: &str = "MT9002";
/// The input bytes are not valid UTF-8.
pub const INVALID_ENCODING: &str = "MT9003";

/// A token did not fit the message structure.
pub const SYNTAX_UNEXPECTED_TOKEN: &str = "MT9101";
/// Tokens remain after a complete message.
pub const SYNTAX_TRAILING_INPUT: &str = "MT9102";
/// The grammar matched but a field the builder needs was not captured.
pub const GRAMMAR_MISSING_CAPTURE: &str = "MT9103";

/// A date field is not a valid fixed-width calendar date.
pub const CAPTURE_INVALID_DATE: &str = "MT9201";
/// An amount field is not a valid comma-decimal number.
pub const CAPTURE_INVALID_AMOUNT: &str = "MT9202";

/// A reference starts or ends with `/` or contains `//`.
pub const BAD_REFERENCE: &str = "MT9301";
/// A statement line's transaction identification code is not allowed.
pub const BAD_TRANSACTION_IDENT: &str = "MT9302";
/// A balance currency is not in the ISO 4217 table.
pub const BAD_CURRENCY: &str = "MT9303";

/// A message has no statement lines, so a per-statement export has no rows for it.
pub const NO_STATEMENT_LINES: &str = "MT9401";

/// `(code, explanation)` pairs for every known diagnostic code.
pub const EXPLANATIONS: &[(&str, &str)] = &[
    (
        LEX_UNRECOGNIZED_INPUT,
        "The lexer found text that no rule of the current tag state accepts. \
         This usually means an unknown tag, a missing line break, or a character \
         outside the SWIFT X character set.",
    ),
    (
        LEX_STATE_UNDERFLOW,
        "The lexer state stack lost synchronisation: a rule tried to leave the \
         root state. The input is malformed in a way the state table cannot recover from.",
    ),
    (
        INVALID_ENCODING,
        "MT940 messages are plain text; the input contains bytes that are not valid UTF-8.",
    ),
    (
        SYNTAX_UNEXPECTED_TOKEN,
        "The tags are not in the order MT940 requires (20, [21], 25, 28C, 60a, \
         (61 [86])*, 62a, [64], 65*, [86]) or a tag body is malformed.",
    ),
    (
        SYNTAX_TRAILING_INPUT,
        "Additional content follows a complete MT940 message and trailing input is not allowed.",
    ),
    (
        GRAMMAR_MISSING_CAPTURE,
        "The grammar matched the input but did not capture a field the message \
         builder requires. This indicates an inconsistent grammar definition.",
    ),
    (
        CAPTURE_INVALID_DATE,
        "Dates are YYMMDD (value, balance dates) or MMDD (entry date) and must \
         name a real calendar day.",
    ),
    (
        CAPTURE_INVALID_AMOUNT,
        "Amounts are digits with an optional comma decimal separator, e.g. 1234,56.",
    ),
    (
        BAD_REFERENCE,
        "References (fields 20 and 21) must not start or end with a slash and \
         must not contain two consecutive slashes (network validated rule T26).",
    ),
    (
        BAD_TRANSACTION_IDENT,
        "Transaction identification must be S followed by three digits, or N/F \
         followed by a registered three-character statement identification code.",
    ),
    (
        BAD_CURRENCY,
        "The balance currency must be a valid ISO 4217 currency code (network validated rule T52).",
    ),
    (
        NO_STATEMENT_LINES,
        "The message is valid but contains no :61: statement lines, so a \
         row-per-statement export produces no rows for it.",
    ),
];

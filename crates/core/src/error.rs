//! Error type shared by every stage of a parse.

use crate::grammar::capture::CaptureError;
use crate::validate::ValidationError;
use mt9x_diagnostics::{Diagnostic, Span, codes};

/// Why a message could not be turned into a validated [`crate::Message`].
///
/// Every variant is fatal for the input it was produced from: no partial
/// tree is ever returned alongside it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input bytes are not UTF-8.
    #[error("input is not valid UTF-8 (first invalid byte at offset {offset})")]
    Encoding {
        /// Byte offset of the first invalid byte.
        offset: usize,
    },

    /// No rule of the active lexer state matches at the cursor.
    #[error("line {line}, column {column}: unrecognized input {snippet:?} in lexer state {state}")]
    Lex {
        /// Byte offset of the cursor.
        offset: usize,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Name of the state on top of the stack.
        state: &'static str,
        /// A few characters of input starting at the cursor.
        snippet: String,
    },

    /// A `pop` transition fired while only the root state was on the stack.
    #[error("line {line}, column {column}: lexer state stack underflow in state {state}")]
    StackUnderflow {
        /// Byte offset of the match that triggered the pop.
        offset: usize,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Name of the state that tried to pop.
        state: &'static str,
    },

    /// The token sequence does not fit the message grammar.
    #[error("line {line}, column {column}: unexpected {found}, expected {}", .expected.join(" | "))]
    Syntax {
        /// Source span of the offending token.
        span: Span,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Token kinds that would have been accepted.
        expected: Vec<String>,
        /// What was found instead.
        found: String,
    },

    /// A complete message was followed by more tokens.
    #[error("line {line}, column {column}: unexpected {found} after the end of the message")]
    TrailingInput {
        /// Source span of the first trailing token.
        span: Span,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// The first trailing token.
        found: String,
    },

    /// A date or amount token failed its typed conversion.
    #[error("line {line}, column {column}: invalid {field} {value:?}: {reason}")]
    Capture {
        /// Field name, e.g. `"value_date"`.
        field: &'static str,
        /// Raw token text.
        value: String,
        /// Source span of the token.
        span: Span,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Why the conversion failed.
        #[source]
        reason: CaptureError,
    },

    /// The grammar matched but a field the builder reads was never captured.
    #[error("grammar node {node} has no {field} capture")]
    MissingCapture {
        /// Grammar node name.
        node: &'static str,
        /// Missing field.
        field: &'static str,
    },

    /// A network validated rule is violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Encoding { .. } => codes::INVALID_ENCODING,
            Error::Lex { .. } => codes::LEX_UNRECOGNIZED_INPUT,
            Error::StackUnderflow { .. } => codes::LEX_STATE_UNDERFLOW,
            Error::Syntax { .. } => codes::SYNTAX_UNEXPECTED_TOKEN,
            Error::TrailingInput { .. } => codes::SYNTAX_TRAILING_INPUT,
            Error::Capture { reason, .. } => match reason {
                CaptureError::InvalidAmount(_) => codes::CAPTURE_INVALID_AMOUNT,
                _ => codes::CAPTURE_INVALID_DATE,
            },
            Error::MissingCapture { .. } => codes::GRAMMAR_MISSING_CAPTURE,
            Error::Validation(v) => v.code(),
        }
    }

    /// Source span the error refers to, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Encoding { offset }
            | Error::Lex { offset, .. }
            | Error::StackUnderflow { offset, .. } => Some(Span::empty(*offset)),
            Error::Syntax { span, .. }
            | Error::TrailingInput { span, .. }
            | Error::Capture { span, .. } => Some(*span),
            Error::MissingCapture { .. } | Error::Validation(_) => None,
        }
    }

    /// Returns `true` for network validated rule violations (as opposed to
    /// input that could not be parsed at all).
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Convert into a structured [`Diagnostic`] for rendering.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), self.span());
        match self {
            Error::Lex { state, snippet, .. } => {
                diag.with_context(ctx!("state" => *state, "found" => snippet.as_str()))
            }
            Error::StackUnderflow { state, .. } => diag.with_context(ctx!("state" => *state)),
            Error::Syntax {
                expected, found, ..
            } => diag.with_context(ctx!(
                "expected" => expected.join(" | "),
                "found" => found.as_str(),
            )),
            Error::TrailingInput { found, .. } => diag.with_context(ctx!("found" => found.as_str())),
            Error::Capture { field, value, .. } => {
                diag.with_context(ctx!("field" => *field, "value" => value.as_str()))
            }
            Error::MissingCapture { node, field } => {
                diag.with_context(ctx!("node" => *node, "field" => *field))
            }
            Error::Validation(v) => diag.with_context(v.context()),
            Error::Encoding { .. } => diag,
        }
    }
}

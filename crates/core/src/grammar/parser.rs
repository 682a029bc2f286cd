use mt9x_reference_data::ReferenceTables;

use super::ast::Message;
use super::engine::{DEFAULT_LOOKAHEAD, Engine};
use super::lexer::tokenize;
use super::mt940::{MESSAGE_NODE, build_message, message_rule};
use crate::Error;
use crate::validate::validate_with_tables;

/// Grammar engine settings for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Tokens a failing optional/repeated/alternative branch may consume and
    /// still backtrack.
    pub lookahead: usize,
    /// Ignore tokens after a complete message instead of failing with
    /// [`Error::TrailingInput`]. Trailing blank lines are accepted either way.
    pub allow_trailing: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            allow_trailing: true,
        }
    }
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse one MT940 message without validating it.
pub fn parse_str(input: &str) -> Result<Message, Error> {
    MessageParser::new().parse(input)
}

/// Parse one MT940 message from raw bytes, which must be UTF-8.
pub fn parse_bytes(input: &[u8]) -> Result<Message, Error> {
    MessageParser::new().parse_bytes(input)
}

/// Parse one MT940 message and check the network validated rules.
pub fn parse_and_validate(input: &str, tables: &ReferenceTables) -> Result<Message, Error> {
    MessageParser::new().validate_with(tables).parse(input)
}

/// Configurable parse pipeline: lex, match the grammar, build the typed
/// tree, and optionally validate it.
///
/// A parser holds no per-input state, so one instance can be shared by
/// threads parsing different messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageParser<'t> {
    options: ParseOptions,
    tables: Option<&'t ReferenceTables>,
}

impl<'t> MessageParser<'t> {
    /// Parser with default options and no validation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the grammar lookahead.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.options.lookahead = lookahead;
        self
    }

    /// Accept trailing tokens after a complete message (the default).
    pub fn allow_trailing(mut self, allow: bool) -> Self {
        self.options.allow_trailing = allow;
        self
    }

    /// Validate every parsed message against `tables`.
    pub fn validate_with(mut self, tables: &'t ReferenceTables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// The active options.
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse (and, if configured, validate) one message.
    pub fn parse(&self, input: &str) -> Result<Message, Error> {
        let tokens = tokenize(input)?;
        tracing::trace!(tokens = tokens.len(), "lexed message");
        let root = Engine::new(MESSAGE_NODE, message_rule())
            .with_lookahead(self.options.lookahead)
            .allow_trailing(self.options.allow_trailing)
            .parse(&tokens)?;
        let msg = build_message(&root)?;
        if let Some(tables) = self.tables {
            validate_with_tables(&msg, tables)?;
        }
        Ok(msg)
    }

    /// [`MessageParser::parse`] for raw bytes, which must be UTF-8.
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Message, Error> {
        let text = std::str::from_utf8(input).map_err(|e| Error::Encoding {
            offset: e.valid_up_to(),
        })?;
        self.parse(text)
    }
}

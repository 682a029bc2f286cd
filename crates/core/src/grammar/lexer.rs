//! Stateful, stack-based lexer for MT9x statement text.
//!
//! The lexer keeps an explicit stack of states. Each state owns an ordered
//! list of rules; at every position the first rule of the top state whose
//! pattern matches a non-empty prefix wins, emits its token and applies its
//! transition. A `Return` rule matches nothing and pops the state, which is
//! how a tag body hands control back to its parent once none of its own
//! rules apply.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use mt9x_diagnostics::Span;
use regex::Regex;

use super::charset;
use crate::Error;

/// Longest input excerpt carried in a lexical error.
const SNIPPET_CHARS: usize = 12;

// ─── Tokens ─────────────────────────────────────────────────────────────────

/// Classification of an MT9x lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokKind {
    /// `\r\n`.
    Crlf,
    /// `:20:` transaction reference number.
    T20,
    /// `:21:` related reference.
    T21,
    /// `:25:` account identification.
    T25,
    /// `:25P:` account identification with owner identifier.
    T25P,
    /// `:28C:` statement number / sequence number.
    T28C,
    /// `:60F:` first opening balance.
    T60F,
    /// `:60M:` intermediate opening balance.
    T60M,
    /// `:61:` statement line.
    T61,
    /// `:86:` information to account owner.
    T86,
    /// `:62F:` final closing balance.
    T62F,
    /// `:62M:` intermediate closing balance.
    T62M,
    /// `:64:` closing available balance.
    T64,
    /// `:65:` forward available balance.
    T65,
    /// Free text (X character set).
    FreeText,
    /// Reference text without `//`.
    Reference,
    /// `//` separating the owner and institution references.
    TwoSlashes,
    /// Run of digits.
    Number,
    /// `/`.
    Slash,
    /// Balance `D`/`C`.
    DcMark,
    /// Statement line `D`/`C`/`RD`/`RC`.
    RdcMark,
    /// Single capital letter funds code.
    FundsCode,
    /// `YYMMDD`.
    Date,
    /// `MMDD`.
    EntryDate,
    /// Three-letter currency code.
    Currency,
    /// Comma-decimal amount.
    Amount,
    /// Transaction type identification code.
    TransIdent,
    /// End of input. Emitted exactly once, as the last token.
    Eof,
}

impl TokKind {
    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            TokKind::Crlf => "line break",
            TokKind::T20 => ":20:",
            TokKind::T21 => ":21:",
            TokKind::T25 => ":25:",
            TokKind::T25P => ":25P:",
            TokKind::T28C => ":28C:",
            TokKind::T60F => ":60F:",
            TokKind::T60M => ":60M:",
            TokKind::T61 => ":61:",
            TokKind::T86 => ":86:",
            TokKind::T62F => ":62F:",
            TokKind::T62M => ":62M:",
            TokKind::T64 => ":64:",
            TokKind::T65 => ":65:",
            TokKind::FreeText => "text",
            TokKind::Reference => "reference",
            TokKind::TwoSlashes => "//",
            TokKind::Number => "number",
            TokKind::Slash => "/",
            TokKind::DcMark => "debit/credit mark",
            TokKind::RdcMark => "(reversal) debit/credit mark",
            TokKind::FundsCode => "funds code",
            TokKind::Date => "date",
            TokKind::EntryDate => "entry date",
            TokKind::Currency => "currency",
            TokKind::Amount => "amount",
            TokKind::TransIdent => "transaction type",
            TokKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token that borrows its text directly from the source input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Borrowed slice of the source input (`&input[span.start..span.end]`).
    pub text: &'a str,
    /// Byte range in the source.
    pub span: Span,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column (in characters) of the first character.
    pub column: usize,
}

// ─── State table ────────────────────────────────────────────────────────────

/// Lexer states of the MT940 table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    /// Between fields: only tag openers and line breaks.
    Root,
    /// `:20:` body.
    Tag20,
    /// `:21:` body.
    Tag21,
    /// `:25:` account line.
    Tag25,
    /// Optional second line of `:25:` (owner identifier code).
    Tag25Ident,
    /// `:28C:` body.
    Tag28,
    /// Body of a balance field (`:60a:`, `:62a:`, `:64:`, `:65:`).
    Balance,
    /// Amount following a balance currency.
    BalanceAmount,
    /// Start of a `:61:` statement line.
    Tag61,
    /// Optional entry date after the value date.
    Tag61EntryDate,
    /// Funds code and amount after the mark.
    Tag61Amount,
    /// Transaction type identification code.
    Tag61Ident,
    /// Owner and institution references.
    Tag61Reference,
    /// Supplementary details line.
    Tag61Details,
    /// `:86:` body.
    Tag86,
}

impl StateId {
    /// State name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            StateId::Root => "Root",
            StateId::Tag20 => "Tag20",
            StateId::Tag21 => "Tag21",
            StateId::Tag25 => "Tag25",
            StateId::Tag25Ident => "Tag25Ident",
            StateId::Tag28 => "Tag28",
            StateId::Balance => "Balance",
            StateId::BalanceAmount => "BalanceAmount",
            StateId::Tag61 => "Tag61",
            StateId::Tag61EntryDate => "Tag61EntryDate",
            StateId::Tag61Amount => "Tag61Amount",
            StateId::Tag61Ident => "Tag61Ident",
            StateId::Tag61Reference => "Tag61Reference",
            StateId::Tag61Details => "Tag61Details",
            StateId::Tag86 => "Tag86",
        }
    }
}

/// What happens to the state stack after a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stay in the current state.
    None,
    /// Enter a nested state.
    Push(StateId),
    /// Return to the enclosing state.
    Pop,
}

/// One rule of a lexer state.
#[derive(Debug, Clone)]
pub struct LexRule {
    kind: Option<TokKind>,
    pattern: Option<Regex>,
    transition: Transition,
}

impl LexRule {
    /// Emit `kind` when `pattern` (a regex source) matches.
    pub fn token(kind: TokKind, pattern: &str, transition: Transition) -> Self {
        Self {
            kind: Some(kind),
            pattern: Some(charset::anchored(pattern)),
            transition,
        }
    }

    /// Emit `kind` when the exact text `literal` follows.
    pub fn literal(kind: TokKind, literal: &str, transition: Transition) -> Self {
        Self::token(kind, &regex::escape(literal), transition)
    }

    /// Match nothing and pop the current state.
    pub fn ret() -> Self {
        Self {
            kind: None,
            pattern: None,
            transition: Transition::Pop,
        }
    }
}

/// Ordered rules per state.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    states: HashMap<StateId, Vec<LexRule>>,
}

static MT940_TABLE: LazyLock<StateTable> = LazyLock::new(StateTable::build_mt940);

impl StateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rules of `state`, replacing any previous ones.
    pub fn with_state(mut self, state: StateId, rules: Vec<LexRule>) -> Self {
        self.states.insert(state, rules);
        self
    }

    /// Rules of `state`, in match order.
    pub fn rules(&self, state: StateId) -> &[LexRule] {
        self.states.get(&state).map(Vec::as_slice).unwrap_or_default()
    }

    /// The MT940 table, compiled once per process.
    pub fn mt940() -> &'static StateTable {
        &MT940_TABLE
    }

    fn build_mt940() -> Self {
        use StateId as S;
        use TokKind as K;
        use Transition::{None as Stay, Pop, Push};

        let tag = |k: K, lit: &str, next: S| LexRule::literal(k, lit, Push(next));
        let rule = LexRule::token;

        Self::new()
            .with_state(
                S::Root,
                vec![
                    rule(K::Crlf, charset::CRLF, Stay),
                    tag(K::T20, ":20:", S::Tag20),
                    tag(K::T21, ":21:", S::Tag21),
                    tag(K::T25, ":25:", S::Tag25),
                    tag(K::T25P, ":25P:", S::Tag25),
                    tag(K::T28C, ":28C:", S::Tag28),
                    tag(K::T60F, ":60F:", S::Balance),
                    tag(K::T60M, ":60M:", S::Balance),
                    tag(K::T61, ":61:", S::Tag61),
                    tag(K::T86, ":86:", S::Tag86),
                    tag(K::T62F, ":62F:", S::Balance),
                    tag(K::T62M, ":62M:", S::Balance),
                    tag(K::T64, ":64:", S::Balance),
                    tag(K::T65, ":65:", S::Balance),
                ],
            )
            .with_state(
                S::Tag20,
                vec![
                    rule(K::FreeText, charset::FREE_TEXT, Stay),
                    rule(K::Crlf, charset::CRLF, Pop),
                ],
            )
            .with_state(
                S::Tag21,
                vec![
                    rule(K::FreeText, charset::FREE_TEXT, Stay),
                    rule(K::Crlf, charset::CRLF, Pop),
                ],
            )
            .with_state(
                S::Tag25,
                vec![
                    rule(K::FreeText, charset::FREE_TEXT, Stay),
                    rule(K::Crlf, charset::CRLF, Push(S::Tag25Ident)),
                    LexRule::ret(),
                ],
            )
            .with_state(
                S::Tag25Ident,
                vec![
                    rule(K::FreeText, charset::FREE_TEXT, Stay),
                    rule(K::Crlf, charset::CRLF, Pop),
                    LexRule::ret(),
                ],
            )
            .with_state(
                S::Tag28,
                vec![
                    rule(K::Number, charset::NUMERIC_SEQ, Stay),
                    LexRule::literal(K::Slash, "/", Stay),
                    rule(K::Crlf, charset::CRLF, Pop),
                ],
            )
            // Date and currency before the mark: `C` and `D` also open
            // currency codes such as CHF or DKK.
            .with_state(
                S::Balance,
                vec![
                    rule(K::Date, charset::DATE6, Stay),
                    rule(K::Currency, charset::CURRENCY, Push(S::BalanceAmount)),
                    rule(K::DcMark, charset::DC_MARK, Stay),
                    rule(K::Crlf, charset::CRLF, Pop),
                ],
            )
            .with_state(
                S::BalanceAmount,
                vec![
                    rule(K::Amount, charset::AMOUNT, Pop),
                    rule(K::Crlf, charset::CRLF, Pop),
                ],
            )
            .with_state(
                S::Tag61,
                vec![
                    rule(K::Date, charset::DATE6, Push(S::Tag61EntryDate)),
                    rule(K::RdcMark, charset::RDC_MARK, Push(S::Tag61Amount)),
                    rule(K::Crlf, charset::CRLF, Stay),
                    LexRule::ret(),
                ],
            )
            .with_state(
                S::Tag61EntryDate,
                vec![rule(K::EntryDate, charset::DATE4, Stay), LexRule::ret()],
            )
            .with_state(
                S::Tag61Amount,
                vec![
                    rule(K::FundsCode, charset::FUNDS_CODE, Stay),
                    rule(K::Amount, charset::AMOUNT, Push(S::Tag61Ident)),
                    LexRule::ret(),
                ],
            )
            .with_state(
                S::Tag61Ident,
                vec![
                    rule(K::TransIdent, charset::TRANS_IDENT, Push(S::Tag61Reference)),
                    LexRule::ret(),
                ],
            )
            .with_state(
                S::Tag61Reference,
                vec![
                    rule(K::Reference, charset::REFERENCE, Stay),
                    LexRule::literal(K::TwoSlashes, "//", Stay),
                    rule(K::Crlf, charset::CRLF, Push(S::Tag61Details)),
                    LexRule::ret(),
                ],
            )
            .with_state(
                S::Tag61Details,
                vec![rule(K::FreeText, charset::FREE_TEXT, Stay), LexRule::ret()],
            )
            .with_state(
                S::Tag86,
                vec![
                    rule(K::FreeText, charset::FREE_TEXT, Stay),
                    rule(K::Crlf, charset::CRLF, Stay),
                    LexRule::ret(),
                ],
            )
    }
}

// ─── Lexer ──────────────────────────────────────────────────────────────────

/// Tokenizer over one input. Each instance owns its state stack, so separate
/// inputs can be lexed concurrently against the same [`StateTable`].
#[derive(Debug)]
pub struct Lexer<'a, 't> {
    input: &'a str,
    table: &'t StateTable,
    stack: Vec<StateId>,
    pos: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a, 't> Lexer<'a, 't> {
    /// Start lexing `input` in [`StateId::Root`].
    pub fn new(input: &'a str, table: &'t StateTable) -> Self {
        Self {
            input,
            table,
            stack: vec![StateId::Root],
            pos: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Current depth of the state stack (1 = root only).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn state(&self) -> StateId {
        self.stack.last().copied().unwrap_or(StateId::Root)
    }

    fn pop(&mut self) -> Result<(), Error> {
        let state = self.state();
        if self.stack.len() <= 1 {
            return Err(Error::StackUnderflow {
                offset: self.pos,
                line: self.line,
                column: self.column,
                state: state.name(),
            });
        }
        self.stack.pop();
        tracing::trace!(from = state.name(), to = self.state().name(), "lexer pop");
        Ok(())
    }

    fn push(&mut self, next: StateId) {
        tracing::trace!(from = self.state().name(), to = next.name(), "lexer push");
        self.stack.push(next);
    }

    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    fn unrecognized(&self) -> Error {
        Error::Lex {
            offset: self.pos,
            line: self.line,
            column: self.column,
            state: self.state().name(),
            snippet: self.input[self.pos..].chars().take(SNIPPET_CHARS).collect(),
        }
    }

    /// Produce the next token, `Ok(None)` once [`TokKind::Eof`] has been
    /// returned.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, Error> {
        if self.finished {
            return Ok(None);
        }
        'scan: loop {
            if self.pos >= self.input.len() {
                self.finished = true;
                return Ok(Some(Token {
                    kind: TokKind::Eof,
                    text: "",
                    span: Span::empty(self.input.len()),
                    line: self.line,
                    column: self.column,
                }));
            }
            let rest = &self.input[self.pos..];
            let table = self.table;
            for rule in table.rules(self.state()) {
                let (Some(kind), Some(re)) = (rule.kind, rule.pattern.as_ref()) else {
                    self.pop()?;
                    continue 'scan;
                };
                let Some(m) = re.find(rest) else { continue };
                if m.end() == 0 {
                    continue;
                }
                let text = &rest[..m.end()];
                let token = Token {
                    kind,
                    text,
                    span: Span::new(self.pos, self.pos + text.len()),
                    line: self.line,
                    column: self.column,
                };
                tracing::trace!(
                    kind = kind.name(),
                    text,
                    offset = self.pos,
                    state = self.state().name(),
                    "token"
                );
                self.advance(text);
                match rule.transition {
                    Transition::None => {}
                    Transition::Push(next) => self.push(next),
                    Transition::Pop => self.pop()?,
                }
                return Ok(Some(token));
            }
            return Err(self.unrecognized());
        }
    }
}

/// Tokenize `input` with the MT940 state table.
///
/// The returned tokens borrow from `input` and always end with exactly one
/// [`TokKind::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, Error> {
    tokenize_with(input, StateTable::mt940())
}

/// Tokenize `input` with an explicit state table.
pub fn tokenize_with<'a>(input: &'a str, table: &StateTable) -> Result<Vec<Token<'a>>, Error> {
    let mut lexer = Lexer::new(input, table);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next_token()? {
        tokens.push(tok);
    }
    Ok(tokens)
}

//! Generic grammar engine.
//!
//! A grammar is a [`Rule`] value: tokens, captures, sequences, optional and
//! repeated parts, alternations, and named groups. One engine interprets any
//! such rule over a token slice and produces a tree of [`CaptureNode`]s.
//!
//! Optional, repeated and alternative parts backtrack when their branch
//! fails within the first `lookahead` tokens it consumed. A branch that fails
//! later than that is committed: the failure becomes the parse error.

use mt9x_diagnostics::Span;

use super::lexer::{TokKind, Token};
use crate::Error;

/// Default number of tokens a branch may consume before it is committed.
pub const DEFAULT_LOOKAHEAD: usize = 2;

// ─── Rules ──────────────────────────────────────────────────────────────────

/// Declarative grammar rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Match one token of this kind and discard it.
    Token(TokKind),
    /// Match one token of this kind and record its text under a field name.
    Capture(&'static str, TokKind),
    /// Match every rule in order.
    Seq(Vec<Rule>),
    /// Match the rule or nothing.
    Optional(Box<Rule>),
    /// Match the rule zero or more times.
    Repeat(Box<Rule>),
    /// Match the first alternative that succeeds.
    Alt(Vec<Rule>),
    /// Match the rule and collect its captures into a named child node.
    Group(&'static str, Box<Rule>),
}

/// [`Rule::Token`].
pub fn tok(kind: TokKind) -> Rule {
    Rule::Token(kind)
}

/// [`Rule::Capture`].
pub fn cap(field: &'static str, kind: TokKind) -> Rule {
    Rule::Capture(field, kind)
}

/// [`Rule::Seq`].
pub fn seq(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(rules.into_iter().collect())
}

/// [`Rule::Optional`].
pub fn opt(rule: Rule) -> Rule {
    Rule::Optional(Box::new(rule))
}

/// [`Rule::Repeat`].
pub fn many(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

/// [`Rule::Alt`].
pub fn alt(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Alt(rules.into_iter().collect())
}

/// [`Rule::Group`].
pub fn group(name: &'static str, rule: Rule) -> Rule {
    Rule::Group(name, Box::new(rule))
}

// ─── Captures ───────────────────────────────────────────────────────────────

/// Text of one captured token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'a> {
    /// Borrowed token text.
    pub text: &'a str,
    /// Byte range in the source.
    pub span: Span,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl<'a> From<&Token<'a>> for Capture<'a> {
    fn from(tok: &Token<'a>) -> Self {
        Self {
            text: tok.text,
            span: tok.span,
            line: tok.line,
            column: tok.column,
        }
    }
}

/// A captured value: token text or a nested group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured<'a> {
    /// A [`Rule::Capture`] result.
    Text(Capture<'a>),
    /// A [`Rule::Group`] result.
    Node(CaptureNode<'a>),
}

/// Ordered captures of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureNode<'a> {
    /// Group name.
    pub name: &'static str,
    /// Source range covered by the group's tokens.
    pub span: Span,
    /// Captures in input order. A field name may repeat.
    pub fields: Vec<(&'static str, Captured<'a>)>,
}

impl<'a> CaptureNode<'a> {
    /// First text capture named `field`.
    pub fn text(&self, field: &str) -> Option<&Capture<'a>> {
        self.fields.iter().find_map(|(name, c)| match c {
            Captured::Text(t) if *name == field => Some(t),
            _ => None,
        })
    }

    /// All text captures named `field`, in input order.
    pub fn texts<'s>(&'s self, field: &'s str) -> impl Iterator<Item = &'s Capture<'a>> + 's {
        self.fields.iter().filter_map(move |(name, c)| match c {
            Captured::Text(t) if *name == field => Some(t),
            _ => None,
        })
    }

    /// First child group named `name`.
    pub fn child(&self, name: &str) -> Option<&CaptureNode<'a>> {
        self.fields.iter().find_map(|(n, c)| match c {
            Captured::Node(node) if *n == name => Some(node),
            _ => None,
        })
    }

    /// All child groups named `name`, in input order.
    pub fn children<'s>(
        &'s self,
        name: &'s str,
    ) -> impl Iterator<Item = &'s CaptureNode<'a>> + 's {
        self.fields.iter().filter_map(move |(n, c)| match c {
            Captured::Node(node) if *n == name => Some(node),
            _ => None,
        })
    }

    /// Like [`CaptureNode::text`], but a missing capture is an error.
    pub fn require_text(&self, field: &'static str) -> Result<&Capture<'a>, Error> {
        self.text(field).ok_or(Error::MissingCapture {
            node: self.name,
            field,
        })
    }

    /// Like [`CaptureNode::child`], but a missing group is an error.
    pub fn require_child(&self, name: &'static str) -> Result<&CaptureNode<'a>, Error> {
        self.child(name).ok_or(Error::MissingCapture {
            node: self.name,
            field: name,
        })
    }
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Interprets a [`Rule`] over a token slice.
#[derive(Debug, Clone)]
pub struct Engine<'r> {
    name: &'static str,
    rule: &'r Rule,
    lookahead: usize,
    allow_trailing: bool,
}

impl<'r> Engine<'r> {
    /// Create an engine for `rule`; the root capture node is called `name`.
    pub fn new(name: &'static str, rule: &'r Rule) -> Self {
        Self {
            name,
            rule,
            lookahead: DEFAULT_LOOKAHEAD,
            allow_trailing: true,
        }
    }

    /// Set how many tokens a failing branch may consume and still backtrack.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Accept (and ignore) tokens left over after the rule matched. Blank
    /// lines after the match are always accepted.
    pub fn allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }

    /// Match the rule against `tokens`.
    pub fn parse<'a>(&self, tokens: &[Token<'a>]) -> Result<CaptureNode<'a>, Error> {
        let mut run = Run {
            tokens,
            pos: 0,
            lookahead: self.lookahead,
            deepest: None,
        };
        let mut fields = Vec::new();
        if run.apply(self.rule, &mut fields).is_err() {
            return Err(run.syntax_error());
        }

        let rest = tokens.get(run.pos..).unwrap_or_default();
        if let Some(tok) = rest.iter().find(|t| t.kind != TokKind::Crlf && t.kind != TokKind::Eof) {
            // A branch that failed past the end of the match is the real error.
            if run.deepest.as_ref().is_some_and(|f| f.at > run.pos) {
                return Err(run.syntax_error());
            }
            if !self.allow_trailing {
                return Err(Error::TrailingInput {
                    span: tok.span,
                    line: tok.line,
                    column: tok.column,
                    found: describe(tok),
                });
            }
            tracing::trace!(offset = tok.span.start, "ignoring trailing input");
        }

        Ok(CaptureNode {
            name: self.name,
            span: run.span_from(0),
            fields,
        })
    }
}

#[derive(Debug, Clone)]
struct Failure {
    at: usize,
    expected: Vec<TokKind>,
}

struct Run<'a, 's> {
    tokens: &'s [Token<'a>],
    pos: usize,
    lookahead: usize,
    deepest: Option<Failure>,
}

type Fields<'a> = Vec<(&'static str, Captured<'a>)>;

impl<'a> Run<'a, '_> {
    fn apply(&mut self, rule: &Rule, out: &mut Fields<'a>) -> Result<(), Failure> {
        match rule {
            Rule::Token(kind) => self.expect(*kind).map(|_| ()),
            Rule::Capture(field, kind) => {
                let tok = self.expect(*kind)?;
                out.push((*field, Captured::Text(Capture::from(&tok))));
                Ok(())
            }
            Rule::Seq(rules) => rules.iter().try_for_each(|r| self.apply(r, out)),
            Rule::Optional(inner) => {
                let start = (self.pos, out.len());
                match self.apply(inner, out) {
                    Ok(()) => Ok(()),
                    Err(f) => self.backtrack(f, start, out),
                }
            }
            Rule::Repeat(inner) => loop {
                let start = (self.pos, out.len());
                match self.apply(inner, out) {
                    Ok(()) if self.pos == start.0 => return Ok(()),
                    Ok(()) => {}
                    Err(f) => return self.backtrack(f, start, out),
                }
            },
            Rule::Alt(alternatives) => {
                let start = (self.pos, out.len());
                let mut best: Option<Failure> = None;
                for alternative in alternatives {
                    match self.apply(alternative, out) {
                        Ok(()) => return Ok(()),
                        Err(f) => {
                            self.backtrack(f.clone(), start, out)?;
                            if best.as_ref().is_none_or(|b| f.at > b.at) {
                                best = Some(f);
                            }
                        }
                    }
                }
                Err(best.unwrap_or(Failure {
                    at: self.pos,
                    expected: Vec::new(),
                }))
            }
            Rule::Group(name, inner) => {
                let start = self.pos;
                let mut fields = Vec::new();
                self.apply(inner, &mut fields)?;
                out.push((
                    *name,
                    Captured::Node(CaptureNode {
                        name: *name,
                        span: self.span_from(start),
                        fields,
                    }),
                ));
                Ok(())
            }
        }
    }

    fn expect(&mut self, kind: TokKind) -> Result<Token<'a>, Failure> {
        match self.tokens.get(self.pos) {
            Some(tok) if tok.kind == kind => {
                self.pos += 1;
                Ok(*tok)
            }
            _ => Err(self.mismatch(kind)),
        }
    }

    fn mismatch(&mut self, kind: TokKind) -> Failure {
        let failure = Failure {
            at: self.pos,
            expected: vec![kind],
        };
        match &mut self.deepest {
            Some(d) if d.at == failure.at => {
                if !d.expected.contains(&kind) {
                    d.expected.push(kind);
                }
            }
            Some(d) if d.at > failure.at => {}
            _ => self.deepest = Some(failure.clone()),
        }
        failure
    }

    /// Undo a failed branch that began at `start`, or commit to its failure
    /// if it got further than the lookahead allows.
    fn backtrack(
        &mut self,
        failure: Failure,
        start: (usize, usize),
        out: &mut Fields<'a>,
    ) -> Result<(), Failure> {
        if failure.at - start.0 > self.lookahead {
            return Err(failure);
        }
        if failure.at > start.0 {
            tracing::trace!(
                from = start.0,
                failed_at = failure.at,
                "grammar branch backtracked"
            );
        }
        self.pos = start.0;
        out.truncate(start.1);
        Ok(())
    }

    fn span_from(&self, start: usize) -> Span {
        let begin = self
            .tokens
            .get(start)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.span.start);
        if self.pos <= start {
            return Span::empty(begin);
        }
        let end = self.tokens.get(self.pos - 1).map_or(begin, |t| t.span.end);
        Span::new(begin, end.max(begin))
    }

    fn syntax_error(&self) -> Error {
        let (at, expected) = match &self.deepest {
            Some(f) => (f.at, f.expected.clone()),
            None => (self.pos, Vec::new()),
        };
        let (span, line, column, found) = match self.tokens.get(at) {
            Some(tok) => (tok.span, tok.line, tok.column, describe(tok)),
            None => {
                let last = self.tokens.last();
                let end = last.map_or(0, |t| t.span.end);
                (
                    Span::empty(end),
                    last.map_or(1, |t| t.line),
                    last.map_or(1, |t| t.column),
                    TokKind::Eof.name().to_string(),
                )
            }
        };
        Error::Syntax {
            span,
            line,
            column,
            expected: expected.iter().map(|k| k.name().to_string()).collect(),
            found,
        }
    }
}

fn describe(tok: &Token<'_>) -> String {
    match tok.kind {
        TokKind::Eof => TokKind::Eof.name().to_string(),
        TokKind::Crlf => TokKind::Crlf.name().to_string(),
        kind if tok.text == kind.name() => kind.name().to_string(),
        kind => format!("{} {:?}", kind.name(), tok.text),
    }
}

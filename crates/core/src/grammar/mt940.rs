//! The MT940 customer statement grammar and the builder that turns its
//! captures into a typed [`Message`].

use std::sync::LazyLock;

use super::ast::{
    AccountIdent, Balance, DebitCredit, Message, Statement, StatementNumber, StatementSection,
};
use super::capture::{CaptureError, CommaDecimal, FourDigitDate, SixDigitDate};
use super::engine::{Capture, CaptureNode, Rule, alt, cap, group, many, opt, seq, tok};
use super::lexer::TokKind::*;
use crate::Error;

/// Name of the root capture node.
pub const MESSAGE_NODE: &str = "message";

static MESSAGE_RULE: LazyLock<Rule> = LazyLock::new(build_rule);

/// The MT940 message rule, built once per process.
pub fn message_rule() -> &'static Rule {
    &MESSAGE_RULE
}

// ─── Grammar ────────────────────────────────────────────────────────────────

/// A field body ends at a line break, or at the end of a truncated message.
fn line_end() -> Rule {
    alt([tok(Crlf), tok(Eof)])
}

fn balance(name: &'static str) -> Rule {
    group(
        name,
        seq([
            cap("dc_mark", DcMark),
            cap("date", Date),
            cap("currency", Currency),
            cap("amount", Amount),
        ]),
    )
}

fn owner_info(name: &'static str) -> Rule {
    group(
        name,
        seq([
            tok(T86),
            cap("line", FreeText),
            many(seq([tok(Crlf), cap("line", FreeText)])),
            line_end(),
        ]),
    )
}

fn statement_line() -> Rule {
    group(
        "statement",
        seq([
            cap("value_date", Date),
            opt(cap("entry_date", EntryDate)),
            cap("dc_mark", RdcMark),
            opt(cap("funds_code", FundsCode)),
            cap("amount", Amount),
            cap("transaction_ident", TransIdent),
            cap("reference", Reference),
            opt(seq([
                cap("institution_marker", TwoSlashes),
                opt(cap("institution_reference", Reference)),
            ])),
            opt(seq([tok(Crlf), cap("details", FreeText)])),
        ]),
    )
}

fn build_rule() -> Rule {
    seq([
        tok(T20),
        cap("transaction_ref_no", FreeText),
        line_end(),
        opt(seq([tok(T21), cap("related_reference", FreeText), line_end()])),
        alt([tok(T25), tok(T25P)]),
        group(
            "account_identification",
            seq([
                cap("account", FreeText),
                opt(seq([tok(Crlf), cap("ident_code", FreeText)])),
            ]),
        ),
        line_end(),
        tok(T28C),
        group(
            "statement_number",
            seq([
                cap("statement_no", Number),
                opt(seq([tok(Slash), cap("sequence_no", Number)])),
            ]),
        ),
        line_end(),
        alt([tok(T60F), tok(T60M)]),
        balance("opening_balance"),
        line_end(),
        many(group(
            "statement_section",
            seq([
                tok(T61),
                statement_line(),
                line_end(),
                opt(owner_info("owner_info")),
            ]),
        )),
        alt([tok(T62F), tok(T62M)]),
        balance("closing_balance"),
        line_end(),
        opt(seq([
            tok(T64),
            balance("closing_available_balance"),
            line_end(),
        ])),
        many(seq([
            tok(T65),
            balance("forward_available_balance"),
            line_end(),
        ])),
        opt(owner_info("account_owner_info")),
    ])
}

// ─── Builder ────────────────────────────────────────────────────────────────

fn typed<T>(
    capture: &Capture<'_>,
    field: &'static str,
    result: Result<T, CaptureError>,
) -> Result<T, Error> {
    result.map_err(|reason| Error::Capture {
        field,
        value: capture.text.to_string(),
        span: capture.span,
        line: capture.line,
        column: capture.column,
        reason,
    })
}

fn text(node: &CaptureNode<'_>, field: &'static str) -> Result<String, Error> {
    Ok(node.require_text(field)?.text.to_string())
}

fn optional_text(node: &CaptureNode<'_>, field: &str) -> Option<String> {
    node.text(field).map(|c| c.text.to_string())
}

fn date(node: &CaptureNode<'_>, field: &'static str) -> Result<SixDigitDate, Error> {
    let c = node.require_text(field)?;
    typed(c, field, SixDigitDate::parse(c.text))
}

fn amount(node: &CaptureNode<'_>, field: &'static str) -> Result<CommaDecimal, Error> {
    let c = node.require_text(field)?;
    typed(c, field, CommaDecimal::parse(c.text))
}

fn mark(node: &CaptureNode<'_>, field: &'static str) -> Result<DebitCredit, Error> {
    DebitCredit::from_mark(node.require_text(field)?.text).ok_or(Error::MissingCapture {
        node: node.name,
        field,
    })
}

fn owner_lines(node: &CaptureNode<'_>) -> Vec<String> {
    node.texts("line").map(|c| c.text.to_string()).collect()
}

fn build_balance(node: &CaptureNode<'_>) -> Result<Balance, Error> {
    Ok(Balance {
        dc_mark: mark(node, "dc_mark")?,
        date: date(node, "date")?,
        currency: text(node, "currency")?,
        amount: amount(node, "amount")?,
    })
}

fn build_statement(node: &CaptureNode<'_>) -> Result<Statement, Error> {
    let value_date = date(node, "value_date")?;
    let entry_date = node
        .text("entry_date")
        .map(|c| typed(c, "entry_date", FourDigitDate::parse_within(c.text, &value_date)))
        .transpose()?;
    let institution_reference = node
        .text("institution_marker")
        .map(|_| optional_text(node, "institution_reference").unwrap_or_default());
    Ok(Statement {
        value_date,
        entry_date,
        dc_mark: mark(node, "dc_mark")?,
        funds_code: optional_text(node, "funds_code"),
        amount: amount(node, "amount")?,
        transaction_ident: text(node, "transaction_ident")?,
        reference: text(node, "reference")?,
        institution_reference,
        details: optional_text(node, "details"),
    })
}

fn build_section(node: &CaptureNode<'_>) -> Result<StatementSection, Error> {
    Ok(StatementSection {
        statement: build_statement(node.require_child("statement")?)?,
        owner_info: node.child("owner_info").map(owner_lines).unwrap_or_default(),
    })
}

/// Convert the captures of a matched [`message_rule`] into a [`Message`].
///
/// Fails with [`Error::Capture`] when a date or amount does not convert and
/// with [`Error::MissingCapture`] if the tree does not have the shape the
/// grammar produces.
pub fn build_message(root: &CaptureNode<'_>) -> Result<Message, Error> {
    let account = root.require_child("account_identification")?;
    let number = root.require_child("statement_number")?;
    Ok(Message {
        transaction_ref_no: text(root, "transaction_ref_no")?,
        related_reference: optional_text(root, "related_reference"),
        account_identification: AccountIdent {
            account: text(account, "account")?,
            ident_code: optional_text(account, "ident_code"),
        },
        statement_number: StatementNumber {
            statement_no: text(number, "statement_no")?,
            sequence_no: optional_text(number, "sequence_no"),
        },
        opening_balance: build_balance(root.require_child("opening_balance")?)?,
        statements: root
            .children("statement_section")
            .map(build_section)
            .collect::<Result<_, _>>()?,
        closing_balance: build_balance(root.require_child("closing_balance")?)?,
        closing_available_balance: root
            .child("closing_available_balance")
            .map(build_balance)
            .transpose()?,
        forward_available_balances: root
            .children("forward_available_balance")
            .map(build_balance)
            .collect::<Result<_, _>>()?,
        account_owner_info: root
            .child("account_owner_info")
            .map(owner_lines)
            .unwrap_or_default(),
    })
}

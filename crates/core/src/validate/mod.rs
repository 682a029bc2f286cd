//! Network validated rules, checked fail-fast in field order: `:20:` and
//! `:21:` references, statement line transaction types, then balance currencies.

use std::collections::BTreeMap;
use std::fmt;

use mt9x_diagnostics::codes;
use mt9x_reference_data::{CurrencyLookup, ReferenceTables, StatementIdentLookup};

use crate::grammar::ast::{Balance, Message};

/// Which balance field a currency error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceField {
    /// `:60F:` / `:60M:`.
    Opening,
    /// `:62F:` / `:62M:`.
    Closing,
    /// `:64:`.
    ClosingAvailable,
}

impl BalanceField {
    /// Tag of the field.
    pub fn tag(self) -> &'static str {
        match self {
            BalanceField::Opening => "60",
            BalanceField::Closing => "62",
            BalanceField::ClosingAvailable => "64",
        }
    }
}

impl fmt::Display for BalanceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BalanceField::Opening => "opening balance",
            BalanceField::Closing => "closing balance",
            BalanceField::ClosingAvailable => "closing available balance",
        })
    }
}

/// A violated network validated rule.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `:20:` starts or ends with `/` or contains `//`.
    #[error("bad transaction reference number: {0}")]
    TransactionReference(String),

    /// `:21:` starts or ends with `/` or contains `//`.
    #[error("bad related reference number: {0}")]
    RelatedReference(String),

    /// A statement line's transaction type identification code is invalid.
    #[error("statement line {line}: bad transaction ident: {ident}")]
    TransactionIdent {
        /// 1-based position of the statement line in the message.
        line: usize,
        /// The offending code.
        ident: String,
    },

    /// A balance currency is not in the currency table.
    #[error("bad {balance}: bad currency code: {currency}")]
    Currency {
        /// Which balance.
        balance: BalanceField,
        /// The offending code.
        currency: String,
    },
}

impl ValidationError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::TransactionReference(_) | ValidationError::RelatedReference(_) => {
                codes::BAD_REFERENCE
            }
            ValidationError::TransactionIdent { .. } => codes::BAD_TRANSACTION_IDENT,
            ValidationError::Currency { .. } => codes::BAD_CURRENCY,
        }
    }

    /// Machine-readable context for diagnostics.
    pub fn context(&self) -> BTreeMap<String, String> {
        match self {
            ValidationError::TransactionReference(r) => ctx!("tag" => "20", "value" => r.as_str()),
            ValidationError::RelatedReference(r) => ctx!("tag" => "21", "value" => r.as_str()),
            ValidationError::TransactionIdent { line, ident } => ctx!(
                "tag" => "61",
                "statementLine" => line.to_string(),
                "value" => ident.as_str(),
            ),
            ValidationError::Currency { balance, currency } => {
                ctx!("tag" => balance.tag(), "value" => currency.as_str())
            }
        }
    }
}

/// Returns `true` if `reference` neither starts nor ends with `/` and has no
/// `//`.
pub fn is_correct_reference(reference: &str) -> bool {
    !reference.starts_with('/') && !reference.ends_with('/') && !reference.contains("//")
}

/// Returns `true` if `ident` is `S` plus three digits, or `N`/`F` plus a
/// registered statement identification code.
pub fn is_correct_transaction_ident(ident: &str, codes: &impl StatementIdentLookup) -> bool {
    let mut chars = ident.chars();
    let Some(prefix) = chars.next() else {
        return false;
    };
    let code = chars.as_str();
    match prefix {
        'S' => code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit()),
        'N' | 'F' => {
            code.len() == 3
                && code.bytes().all(|b| b.is_ascii_alphanumeric())
                && codes.is_proper_code(code)
        }
        _ => false,
    }
}

fn check_currency(
    balance: &Balance,
    field: BalanceField,
    currencies: &impl CurrencyLookup,
) -> Result<(), ValidationError> {
    if currencies.contains_currency(&balance.currency) {
        Ok(())
    } else {
        Err(ValidationError::Currency {
            balance: field,
            currency: balance.currency.clone(),
        })
    }
}

/// Check the network validated rules, stopping at the first violation.
///
/// Rules are evaluated in this order: the `:20:` and `:21:` references, the
/// transaction type of every statement line in input order, then the
/// currencies of the opening, closing and closing available balances.
pub fn validate(
    msg: &Message,
    currencies: &impl CurrencyLookup,
    ident_codes: &impl StatementIdentLookup,
) -> Result<(), ValidationError> {
    tracing::trace!(statements = msg.statements.len(), "validating message");

    if !is_correct_reference(&msg.transaction_ref_no) {
        return Err(ValidationError::TransactionReference(
            msg.transaction_ref_no.clone(),
        ));
    }
    if let Some(related) = &msg.related_reference
        && !is_correct_reference(related)
    {
        return Err(ValidationError::RelatedReference(related.clone()));
    }

    for (i, line) in msg.statement_lines().enumerate() {
        if !is_correct_transaction_ident(&line.transaction_ident, ident_codes) {
            return Err(ValidationError::TransactionIdent {
                line: i + 1,
                ident: line.transaction_ident.clone(),
            });
        }
    }

    check_currency(&msg.opening_balance, BalanceField::Opening, currencies)?;
    check_currency(&msg.closing_balance, BalanceField::Closing, currencies)?;
    if let Some(available) = &msg.closing_available_balance {
        check_currency(available, BalanceField::ClosingAvailable, currencies)?;
    }
    Ok(())
}

/// [`validate`] against a loaded [`ReferenceTables`] bundle.
pub fn validate_with_tables(msg: &Message, tables: &ReferenceTables) -> Result<(), ValidationError> {
    validate(msg, &tables.currencies, &tables.statement_ident_codes)
}

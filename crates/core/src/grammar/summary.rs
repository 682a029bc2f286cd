//! Human-readable, line-per-field rendering of a message.

use std::fmt;

use super::ast::{AccountIdent, Balance, Message, Statement, StatementNumber, StatementSection};

impl fmt::Display for AccountIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.account)?;
        if let Some(code) = &self.ident_code {
            write!(f, ":{code}")?;
        }
        Ok(())
    }
}

impl fmt::Display for StatementNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement_no)?;
        if let Some(seq) = &self.sequence_no {
            write!(f, "/{seq}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.dc_mark, self.date, self.amount, self.currency
        )
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry_date = self.entry_date.map(|d| d.to_string()).unwrap_or_default();
        write!(
            f,
            "value date: {}; entry date: {}; DC mark: {}; funds code: {}; amount: {}; \
             ident: {}; ref: {}; institution ref: {}; details: {}",
            self.value_date,
            entry_date,
            self.dc_mark,
            self.funds_code.as_deref().unwrap_or_default(),
            self.amount,
            self.transaction_ident,
            self.reference,
            self.institution_reference.as_deref().unwrap_or_default(),
            self.details.as_deref().unwrap_or_default(),
        )
    }
}

impl fmt::Display for StatementSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statement)?;
        if !self.owner_info.is_empty() {
            write!(f, "[{}]", self.owner_info.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "transaction ref no: {}", self.transaction_ref_no)?;
        if let Some(related) = &self.related_reference {
            writeln!(f, "related reference: {related}")?;
        }
        writeln!(f, "account identification: {}", self.account_identification)?;
        writeln!(f, "statement number: {}", self.statement_number)?;
        writeln!(f, "opening balance: {}", self.opening_balance)?;
        for section in &self.statements {
            writeln!(f, "statement: {section}")?;
        }
        write!(f, "closing balance: {}", self.closing_balance)?;
        if let Some(available) = &self.closing_available_balance {
            write!(f, "\nclosing available balance: {available}")?;
        }
        for forward in &self.forward_available_balances {
            write!(f, "\nforward available balance: {forward}")?;
        }
        if !self.account_owner_info.is_empty() {
            write!(f, "\naccount owner info: {}", self.account_owner_info.join(" "))?;
        }
        Ok(())
    }
}

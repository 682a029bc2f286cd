//! Typed MT940 message tree.
//!
//! Serialized field names follow the tag they come from (`tag20`, `tag61`,
//! ...). Absent optional fields are omitted.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::capture::{CommaDecimal, FourDigitDate, SixDigitDate};

/// One MT940 customer statement message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `:20:` reference assigned by the sender.
    #[serde(rename = "tag20")]
    pub transaction_ref_no: String,
    /// `:21:` reference of the MT920 request this message answers.
    #[serde(rename = "tag21", default, skip_serializing_if = "Option::is_none")]
    pub related_reference: Option<String>,
    /// `:25:` / `:25P:` account, optionally with the owner's identifier code.
    #[serde(rename = "tag25")]
    pub account_identification: AccountIdent,
    /// `:28C:` statement and sequence number.
    #[serde(rename = "tag28")]
    pub statement_number: StatementNumber,
    /// `:60F:` / `:60M:` opening balance.
    #[serde(rename = "tag60")]
    pub opening_balance: Balance,
    /// `:61:` statement lines with their `:86:` information.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<StatementSection>,
    /// `:62F:` / `:62M:` closing balance.
    #[serde(rename = "tag62")]
    pub closing_balance: Balance,
    /// `:64:` closing available balance.
    #[serde(rename = "tag64", default, skip_serializing_if = "Option::is_none")]
    pub closing_available_balance: Option<Balance>,
    /// `:65:` forward available balances.
    #[serde(rename = "tag65", default, skip_serializing_if = "Vec::is_empty")]
    pub forward_available_balances: Vec<Balance>,
    /// Message-level `:86:` lines.
    #[serde(rename = "tag86", default, skip_serializing_if = "Vec::is_empty")]
    pub account_owner_info: Vec<String>,
}

/// Body of `:25:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdent {
    /// Account identification.
    pub account: String,
    /// Identifier code of the account owner (second line), if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ident_code: Option<String>,
}

/// Body of `:28C:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementNumber {
    /// Statement number.
    #[serde(rename = "stmt_number")]
    pub statement_no: String,
    /// Sequence number of the message within the statement.
    #[serde(rename = "seq_number", default, skip_serializing_if = "Option::is_none")]
    pub sequence_no: Option<String>,
}

/// Body of a balance field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Debit or credit balance.
    pub dc_mark: DebitCredit,
    /// Balance date.
    pub date: SixDigitDate,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Balance amount.
    pub amount: CommaDecimal,
}

/// A `:61:` line and the `:86:` lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// The statement line.
    #[serde(rename = "tag61")]
    pub statement: Statement,
    /// Information to the account owner about this line.
    #[serde(rename = "tag86", default, skip_serializing_if = "Vec::is_empty")]
    pub owner_info: Vec<String>,
}

/// Body of `:61:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Value date.
    pub value_date: SixDigitDate,
    /// Entry date (booking date), same year as the value date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<FourDigitDate>,
    /// Debit, credit or a reversal of either.
    pub dc_mark: DebitCredit,
    /// Third character of the currency code, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funds_code: Option<String>,
    /// Transaction amount.
    pub amount: CommaDecimal,
    /// Transaction type identification code (`Snnn`, `Nxxx` or `Fxxx`).
    #[serde(rename = "trx_ident")]
    pub transaction_ident: String,
    /// Reference for the account owner.
    #[serde(rename = "owner_ref")]
    pub reference: String,
    /// Reference of the account servicing institution. Empty when `//` is
    /// present without a reference.
    #[serde(rename = "institution_ref", default, skip_serializing_if = "Option::is_none")]
    pub institution_reference: Option<String>,
    /// Supplementary details line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Debit/credit mark of a balance or statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebitCredit {
    /// `D`.
    #[serde(rename = "D")]
    Debit,
    /// `C`.
    #[serde(rename = "C")]
    Credit,
    /// `RD`, reversal of a debit.
    #[serde(rename = "RD")]
    ReversedDebit,
    /// `RC`, reversal of a credit.
    #[serde(rename = "RC")]
    ReversedCredit,
}

impl DebitCredit {
    /// Parse the wire mark.
    pub fn from_mark(mark: &str) -> Option<Self> {
        match mark {
            "D" => Some(Self::Debit),
            "C" => Some(Self::Credit),
            "RD" => Some(Self::ReversedDebit),
            "RC" => Some(Self::ReversedCredit),
            _ => None,
        }
    }

    /// The wire mark.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "D",
            Self::Credit => "C",
            Self::ReversedDebit => "RD",
            Self::ReversedCredit => "RC",
        }
    }

    /// Returns `true` for `RD` and `RC`.
    pub fn is_reversal(self) -> bool {
        matches!(self, Self::ReversedDebit | Self::ReversedCredit)
    }
}

impl fmt::Display for DebitCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Message {
    /// Iterate over the statement lines, skipping their `:86:` information.
    pub fn statement_lines(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter().map(|s| &s.statement)
    }
}

//! Typed captures: conversion of raw date and amount tokens into values.
//!
//! Each conversion fails closed. Malformed text is an error, never a zero
//! or default value.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Two-digit years below this pivot are 20xx, the rest 19xx.
const CENTURY_PIVOT: u32 = 69;

/// Why a token could not be converted into its typed value.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// The text does not have the fixed width of the format.
    #[error("expected {expected} digits, found {found}")]
    Width {
        /// Required number of digits.
        expected: usize,
        /// Number of characters present.
        found: usize,
    },
    /// The text contains something other than ASCII digits.
    #[error("not a number")]
    NotNumeric,
    /// The digits do not name a real calendar day.
    #[error("no such calendar date")]
    NotACalendarDate,
    /// The text is not a comma-decimal amount.
    #[error("not a decimal amount: {0}")]
    InvalidAmount(String),
}

// ─── Amounts ────────────────────────────────────────────────────────────────

/// An exact decimal written with `,` as the fractional separator.
///
/// The scale of the input is preserved, so `"100,00"` renders back as
/// `"100,00"` and `"100"` as `"100"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommaDecimal(pub Decimal);

impl CommaDecimal {
    /// Parse comma-decimal text such as `"1234,56"`, `"50,"` or `"50"`.
    pub fn parse(text: &str) -> Result<Self, CaptureError> {
        let (int_part, frac_part) = match text.split_once(',') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(CaptureError::InvalidAmount(text.to_string()));
        }
        let normalized = if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{int_part}.{frac_part}")
        };
        Decimal::from_str(&normalized)
            .map(CommaDecimal)
            .map_err(|e| CaptureError::InvalidAmount(format!("{text} ({e})")))
    }

    /// The decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for CommaDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_string().replace('.', ","))
    }
}

// ─── Dates ──────────────────────────────────────────────────────────────────

fn fixed_digits(text: &str, width: usize) -> Result<Vec<u32>, CaptureError> {
    if text.len() != width {
        return Err(CaptureError::Width {
            expected: width,
            found: text.len(),
        });
    }
    text.bytes()
        .map(|b| {
            if b.is_ascii_digit() {
                Ok(u32::from(b - b'0'))
            } else {
                Err(CaptureError::NotNumeric)
            }
        })
        .collect()
}

/// A `YYMMDD` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SixDigitDate(pub NaiveDate);

impl SixDigitDate {
    /// Parse exactly six digits as year-of-century, month and day.
    pub fn parse(text: &str) -> Result<Self, CaptureError> {
        let d = fixed_digits(text, 6)?;
        let yy = d[0] * 10 + d[1];
        let year = if yy < CENTURY_PIVOT { 2000 + yy } else { 1900 + yy };
        let month = d[2] * 10 + d[3];
        let day = d[4] * 10 + d[5];
        NaiveDate::from_ymd_opt(year as i32, month, day)
            .map(SixDigitDate)
            .ok_or(CaptureError::NotACalendarDate)
    }

    /// The calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for SixDigitDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%y%m%d"))
    }
}

/// A `MMDD` date whose year comes from the surrounding context (the value
/// date of the same statement line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FourDigitDate(pub NaiveDate);

impl FourDigitDate {
    /// Parse exactly four digits as month and day within `year`.
    pub fn parse(text: &str, year: i32) -> Result<Self, CaptureError> {
        let d = fixed_digits(text, 4)?;
        let month = d[0] * 10 + d[1];
        let day = d[2] * 10 + d[3];
        NaiveDate::from_ymd_opt(year, month, day)
            .map(FourDigitDate)
            .ok_or(CaptureError::NotACalendarDate)
    }

    /// Parse relative to a value date, inheriting its year.
    pub fn parse_within(text: &str, value_date: &SixDigitDate) -> Result<Self, CaptureError> {
        Self::parse(text, value_date.0.year())
    }

    /// The calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for FourDigitDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%m%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_decimal_parses_exactly() {
        let d = CommaDecimal::parse("1234,56").unwrap();
        assert_eq!(d.value(), Decimal::new(123456, 2));
        assert_eq!(d.to_string(), "1234,56");
    }

    #[test]
    fn comma_decimal_accepts_missing_or_empty_fraction() {
        assert_eq!(CommaDecimal::parse("50").unwrap().value(), Decimal::new(50, 0));
        assert_eq!(CommaDecimal::parse("50,").unwrap().value(), Decimal::new(50, 0));
        assert_eq!(CommaDecimal::parse("50,").unwrap().to_string(), "50");
    }

    #[test]
    fn comma_decimal_preserves_scale() {
        assert_eq!(CommaDecimal::parse("100,00").unwrap().to_string(), "100,00");
        assert_eq!(CommaDecimal::parse("0,5").unwrap().to_string(), "0,5");
    }

    #[test]
    fn comma_decimal_rejects_garbage() {
        for bad in ["", ",5", "1.5", "1,2,3", "abc", "12a"] {
            assert!(
                matches!(CommaDecimal::parse(bad), Err(CaptureError::InvalidAmount(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn comma_decimal_serializes_as_string() {
        let d = CommaDecimal::parse("50,00").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"50.00\"");
    }

    #[test]
    fn six_digit_date_round_trips() {
        let d = SixDigitDate::parse("230102").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        assert_eq!(d.to_string(), "230102");
    }

    #[test]
    fn six_digit_date_century_pivot() {
        assert_eq!(SixDigitDate::parse("681231").unwrap().date().year(), 2068);
        assert_eq!(SixDigitDate::parse("690101").unwrap().date().year(), 1969);
    }

    #[test]
    fn six_digit_date_fails_closed() {
        assert_eq!(
            SixDigitDate::parse("999999"),
            Err(CaptureError::NotACalendarDate)
        );
        assert_eq!(
            SixDigitDate::parse("230230"),
            Err(CaptureError::NotACalendarDate)
        );
        assert_eq!(
            SixDigitDate::parse("23010"),
            Err(CaptureError::Width {
                expected: 6,
                found: 5
            })
        );
        assert_eq!(SixDigitDate::parse("23O102"), Err(CaptureError::NotNumeric));
    }

    #[test]
    fn four_digit_date_inherits_year() {
        let value = SixDigitDate::parse("240215").unwrap();
        let entry = FourDigitDate::parse_within("0229", &value).unwrap();
        assert_eq!(entry.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(entry.to_string(), "0229");
    }

    #[test]
    fn four_digit_date_rejects_impossible_day() {
        let value = SixDigitDate::parse("230215").unwrap();
        assert_eq!(
            FourDigitDate::parse_within("0229", &value),
            Err(CaptureError::NotACalendarDate)
        );
        assert_eq!(
            FourDigitDate::parse("1301", 2023),
            Err(CaptureError::NotACalendarDate)
        );
    }

    #[test]
    fn dates_serialize_as_iso() {
        let d = SixDigitDate::parse("230101").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2023-01-01\"");
    }
}

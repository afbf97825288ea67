//! Amount type for handling monetary values exported by the bank.
//!
//! The bank writes amounts with a decimal comma, e.g. `-1234,56`. This module provides the
//! `Amount` type which wraps `Decimal`, parses that format and rounds to two decimal places.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The number of decimal places an amount is rounded to when parsed.
const DECIMAL_PLACES: u32 = 2;

/// Represents an amount of money in the home currency.
///
/// # Examples
///
/// Parsing with a decimal comma:
/// ```
/// # use bank_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1234,56").unwrap();
/// assert_eq!(amount.to_string(), "1,234.56");
/// ```
///
/// Values are rounded to two decimal places:
/// ```
/// # use bank_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("78,005").unwrap();
/// assert_eq!(amount.to_string(), "78.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the value as a float for writing into spreadsheet cells.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or_default()
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative() && !self.is_zero()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl AmountError {
    pub fn into_inner(self) -> rust_decimal::Error {
        self.0
    }
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(',', ".");
        let value = Decimal::from_str(&normalized).map_err(AmountError)?;
        Ok(Amount::new(value.round_dp(DECIMAL_PLACES)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", self.value().abs().to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Amount::new(iter.map(|a| a.value).sum())
    }
}

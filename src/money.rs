//! Exact fixed-point money amounts.
//!
//! Amounts are stored as integer minor units (hundredths), so comparisons
//! such as "inserted equals price" are exact and never depend on a
//! floating-point tolerance.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MINOR_PER_MAJOR: i64 = 100;
const FRACTION_DIGITS: usize = 2;

/// Errors produced by parsing or arithmetic on [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Invalid amount '{input}': {reason}")]
    Parse { input: String, reason: &'static str },

    #[error("Money arithmetic overflowed")]
    Overflow,
}

/// A decimal amount with two fractional digits.
///
/// # Example
///
/// ```rust
/// use ticket_terminal::Money;
///
/// let price: Money = "100".parse().unwrap();
/// let inserted: Money = "120.50".parse().unwrap();
///
/// assert_eq!(inserted.checked_sub(price).unwrap().to_string(), "20.50");
/// assert_eq!(price, Money::from_major(100));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Build an amount from minor units (hundredths).
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Build an amount from whole currency units. Saturates on overflow.
    pub const fn from_major(units: i64) -> Self {
        Money(units.saturating_mul(MINOR_PER_MAJOR))
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    pub fn checked_sub(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Difference clamped at zero; used for "still needed" figures.
    pub fn saturating_sub_floor(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parse_err = |reason| MoneyError::Parse {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, fraction) = match body.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (body, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_err("expected digits before the decimal point"));
        }
        if body.contains('.') && fraction.is_empty() {
            return Err(parse_err("expected digits after the decimal point"));
        }
        if fraction.len() > FRACTION_DIGITS {
            return Err(parse_err("at most two fractional digits are allowed"));
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_err("fractional part must be digits"));
        }

        let whole: i64 = whole.parse().map_err(|_| parse_err("amount is too large"))?;
        let mut minor_fraction: i64 = 0;
        for (i, digit) in fraction.bytes().enumerate() {
            let place = if i == 0 { 10 } else { 1 };
            minor_fraction += i64::from(digit - b'0') * place;
        }

        let minor = whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor_fraction))
            .ok_or_else(|| parse_err("amount is too large"))?;

        Ok(Money(if negative { -minor } else { minor }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount such as \"12.50\" or a whole number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Money)
            .ok_or_else(|| E::custom(MoneyError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(MoneyError::Overflow))?;
        self.visit_i64(v)
    }

    // Floats arrive from YAML/TOML sources; their shortest decimal
    // representation is parsed exactly.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        v.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

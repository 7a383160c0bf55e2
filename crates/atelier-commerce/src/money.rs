//! Money type for representing monetary values.
//!
//! The store sells in a single currency, so an amount is just a count of
//! minor units (centimes). Integer arithmetic avoids the floating-point
//! drift that plagues monetary totals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Minor units per whole unit.
const MINOR_PER_MAJOR: i64 = 100;

/// A monetary amount in minor units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Create from minor units.
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create from whole units.
    ///
    /// ```
    /// use atelier_commerce::Money;
    /// assert_eq!(Money::from_major(150).minor(), 15_000);
    /// ```
    pub const fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Amount in minor units.
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, saturating at the numeric bounds.
    pub fn saturating_mul(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| Money(acc.0.saturating_add(m.0)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / per, abs % per)
    }
}

/// Amount text that is not `123` or `123.45`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount: {0:?}")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parse whole units with up to two decimals, e.g. `150` or `149.5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoneyError(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || frac.len() > 2 || !is_digits(frac) {
            return Err(err());
        }
        let whole: i64 = whole.parse().map_err(|_| err())?;
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };
        let minor = whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(cents))
            .ok_or_else(err)?;
        Ok(Money(if negative { -minor } else { minor }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_major() {
        assert_eq!(Money::from_major(150), Money::from_minor(15_000));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_major(300).to_string(), "300.00");
        assert_eq!(Money::from_minor(4999).to_string(), "49.99");
        assert_eq!(Money::from_minor(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_money_sum_and_multiply() {
        let total: Money = [Money::from_major(150).saturating_mul(2), Money::from_minor(50)]
            .into_iter()
            .sum();
        assert_eq!(total.minor(), 30_050);
        assert_eq!(Money::from_minor(i64::MAX).saturating_mul(2), Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_money_parse() {
        assert_eq!("150".parse::<Money>(), Ok(Money::from_major(150)));
        assert_eq!("149.5".parse::<Money>(), Ok(Money::from_minor(14_950)));
        assert_eq!(" 0.05 ".parse::<Money>(), Ok(Money::from_minor(5)));
        assert!("1.234".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
    }
}

//! Fixed-point currency amounts.
//!
//! Uses `rust_decimal` internally so balance averages and charge arithmetic
//! stay exact: `9500 * 0.06` is `570`, never `569.9999999`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// A currency amount.
///
/// Arithmetic keeps full decimal precision. Only presentation rounds:
/// `Display` always shows exactly two decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use amb_engine::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Decimal places used when displaying an amount.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Wraps a `Decimal` without changing its precision.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Returns the underlying decimal value.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Adds `rhs`, returning `None` if the result does not fit.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl From<i64> for Money {
    fn from(units: i64) -> Self {
        Money(Decimal::from(units))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Money(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.0.round_dp(Self::DISPLAY_SCALE);
        shown.rescale(Self::DISPLAY_SCALE);
        write!(f, "{}", shown)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

/// Scales an amount by a rate such as `0.06` or `0.18`.
impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rate: Decimal) -> Self::Output {
        Money(self.0 * rate)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(money("1").to_string(), "1.00");
        assert_eq!(money("1.5").to_string(), "1.50");
        assert_eq!(money("  2.25  ").to_string(), "2.25");
        assert_eq!(Money::from(500).to_string(), "500.00");
    }

    #[test]
    fn test_display_rounds_but_value_keeps_precision() {
        let third = Money::new(Decimal::from(12500) / Decimal::from(30));
        assert_eq!(third.to_string(), "416.67");
        assert!(third < money("416.67"));
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let a = money("0.1");
        let b = money("0.2");
        assert_eq!(a + b, money("0.3"));
        assert_eq!(money("9500") * Decimal::new(6, 2), money("570"));
        assert_eq!(money("500") * Decimal::new(18, 2), money("90"));
    }

    #[test]
    fn test_negative_detection() {
        assert!(money("-0.01").is_negative());
        assert!(!money("0").is_negative());
        assert!(!money("-0").is_negative());
        assert!(!money("12").is_negative());
    }

    #[test]
    fn test_checked_add_detects_overflow() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.checked_add(Money::from(1)), None);
        assert_eq!(money("1.5").checked_add(money("2")), Some(money("3.5")));
    }

    #[test]
    fn test_sum() {
        let values = [money("1.25"), money("2.50"), money("3")];
        assert_eq!(values.iter().sum::<Money>(), money("6.75"));
        assert_eq!(values.into_iter().sum::<Money>(), money("6.75"));
    }
}

//! Monetary amounts and per-egg rates backed by rust_decimal.
//!
//! Provides canonical parsing from stored strings and formatting without
//! exponent notation. Ledger arithmetic multiplies amounts by integer
//! quantities and divides by integer counts; both are expressed here so the
//! zero-denominator guard lives in one place.

use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A currency amount (or per-egg rate) with exact decimal arithmetic.
///
/// Backed by rust_decimal to avoid floating-point drift.
/// Serializes to a JSON number (not a string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Money {
    /// Create a Money from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Money(value)
    }

    /// Parse a Money from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Money)
    }

    /// Format as a canonical string (no exponent notation, no trailing zeros).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Money(RustDecimal::ZERO)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Divide this amount evenly over `count` units.
    ///
    /// Returns zero when `count` is zero. Every "average per egg" in the
    /// ledger goes through here, so no aggregation can produce NaN/Infinity.
    pub fn per_unit(&self, count: i64) -> Money {
        if count == 0 {
            Money::zero()
        } else {
            Money(self.0 / RustDecimal::from(count))
        }
    }

    /// Round to `dp` decimal places (banker's rounding).
    pub fn round_dp(&self, dp: u32) -> Money {
        Money(self.0.round_dp(dp))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Money {
    fn from(value: RustDecimal) -> Self {
        Money(value)
    }
}

impl From<Money> for RustDecimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::ops::Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl std::ops::Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * RustDecimal::from(rhs))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_parse_roundtrip() {
        let test_cases = vec!["123.456", "0.01", "1000000", "-123.456", "0", "6.6667"];

        for s in test_cases {
            let money = Money::from_str_canonical(s).expect("parse failed");
            let formatted = money.to_canonical_string();
            let reparsed = Money::from_str_canonical(&formatted).expect("reparse failed");
            assert_eq!(money, reparsed, "roundtrip failed for {}", s);
        }
    }

    #[test]
    fn test_money_canonical_no_exponent() {
        let money = Money::from_str_canonical("200").expect("parse failed");
        let formatted = money.to_canonical_string();
        assert!(
            !formatted.contains('e'),
            "formatted string should not contain exponent"
        );
        assert_eq!(formatted, "200");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_str_canonical("10.5").unwrap();
        let b = Money::from_str_canonical("2.5").unwrap();

        assert_eq!((a + b).to_canonical_string(), "13");
        assert_eq!((a - b).to_canonical_string(), "8");
        assert_eq!((-b).to_canonical_string(), "-2.5");
    }

    #[test]
    fn test_money_times_quantity() {
        let crate_price = Money::from_str_canonical("200").unwrap();
        assert_eq!((crate_price * 10).to_canonical_string(), "2000");
        assert_eq!((crate_price * 0).to_canonical_string(), "0");
    }

    #[test]
    fn test_per_unit_divides_evenly() {
        let total = Money::from_str_canonical("2000").unwrap();
        let rate = total.per_unit(300);
        assert_eq!((rate * 300).round_dp(2), total.round_dp(2));
    }

    #[test]
    fn test_per_unit_zero_count_is_zero() {
        let total = Money::from_str_canonical("2000").unwrap();
        assert_eq!(total.per_unit(0), Money::zero());
        assert_eq!(Money::zero().per_unit(0), Money::zero());
    }

    #[test]
    fn test_money_sum() {
        let amounts = vec![
            Money::from_str_canonical("100").unwrap(),
            Money::from_str_canonical("250.50").unwrap(),
            Money::from_str_canonical("49.50").unwrap(),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.to_canonical_string(), "400");
    }

    #[test]
    fn test_money_json_serialization() {
        let money = Money::from_str_canonical("123.45").unwrap();
        let json = serde_json::to_value(money).unwrap();
        // Must serialize as a JSON number, not a string
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.45");
    }

    #[test]
    fn test_money_round_dp() {
        let rate = Money::from_str_canonical("2000").unwrap().per_unit(300);
        assert_eq!(rate.round_dp(2).to_canonical_string(), "6.67");
    }

    #[test]
    fn test_money_display() {
        let money = Money::from_str_canonical("99.99").unwrap();
        assert_eq!(money.to_string(), "99.99");
    }

    #[test]
    fn test_money_ordering() {
        let a = Money::from_str_canonical("10").unwrap();
        let b = Money::from_str_canonical("20").unwrap();
        assert!(a < b);
        assert!(b > a);
    }

    #[test]
    fn test_money_signs() {
        let pos = Money::from_str_canonical("5").unwrap();
        let neg = Money::from_str_canonical("-5").unwrap();
        assert!(pos.is_positive());
        assert!(!pos.is_negative());
        assert!(neg.is_negative());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
        assert_eq!(neg.abs(), pos);
    }
}

//! Fixed-point money type with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so that balances
//! aggregate and compare to zero exactly, without floating-point residue.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing an [`Amount`] from text.
#[derive(Error, Debug)]
pub enum ParseAmountError {
    /// Not a decimal number at all.
    #[error("invalid decimal: {0}")]
    Invalid(#[from] rust_decimal::Error),

    /// More fractional digits than a cent can hold.
    #[error("amount {0} has more than 2 decimal places")]
    TooPrecise(String),

    /// Magnitude above [`Amount::MAX`].
    #[error("amount {0} is out of range")]
    OutOfRange(String),
}

/// A monetary amount that always carries exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use expense_ledger::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Largest magnitude accepted when parsing: 9,999,999,999,999.99.
    ///
    /// Sums of parsed amounts stay well inside `Decimal`'s 96-bit mantissa.
    pub const MAX: Self = Amount(Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2));

    /// Creates a new `Amount` from a `Decimal`, normalizing to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Amount(normalized)
    }

    /// Creates an amount from a count of minor units (cents).
    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, Self::SCALE))
    }

    /// Returns the amount as a count of minor units (cents).
    pub fn cents(&self) -> i128 {
        self.0.mantissa()
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Splits the amount into `parts` shares that sum back to `self` exactly.
    ///
    /// Each share is the amount divided by `parts`, truncated to the cent.
    /// Leftover cents go one each to the leading shares. Returns an empty
    /// vector when `parts` is zero.
    pub fn split_evenly(&self, parts: usize) -> Vec<Amount> {
        if parts == 0 {
            return Vec::new();
        }

        let cents = self.cents();
        let n = parts as i128;
        let share = cents / n;
        let leftover = cents % n;

        (0..n)
            .map(|i| {
                let extra = if i < leftover { 1 } else { 0 };
                Amount(Decimal::from_i128_with_scale(share + extra, Self::SCALE))
            })
            .collect()
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        if decimal.normalize().scale() > Self::SCALE {
            return Err(ParseAmountError::TooPrecise(trimmed.to_string()));
        }
        let amount = Amount::new(decimal);
        if amount.0.scale() != Self::SCALE || amount.abs() > Self::MAX {
            return Err(ParseAmountError::OutOfRange(trimmed.to_string()));
        }
        Ok(amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount::ZERO - self
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(amt("1").to_string(), "1.00");
        assert_eq!(amt("1.5").to_string(), "1.50");
        assert_eq!(amt("1.25").to_string(), "1.25");
        assert_eq!(amt("  2.5  ").to_string(), "2.50");
        assert_eq!(amt("3.1000").to_string(), "3.10");
    }

    #[test]
    fn test_from_str_rejects_sub_cent_precision() {
        assert!(matches!(
            Amount::from_str("1.005"),
            Err(ParseAmountError::TooPrecise(_))
        ));
        assert!(matches!(
            Amount::from_str("abc"),
            Err(ParseAmountError::Invalid(_))
        ));
    }

    #[test]
    fn test_from_str_rejects_out_of_range_magnitude() {
        assert_eq!(Amount::MAX.to_string(), "9999999999999.99");
        assert_eq!(amt("9999999999999.99"), Amount::MAX);
        assert_eq!(amt("-9999999999999.99"), -Amount::MAX);

        for raw in [
            "10000000000000",
            "-10000000000000.00",
            "50000000000000000000000000000",
            "79228162514264337593543950335",
        ] {
            assert!(
                matches!(Amount::from_str(raw), Err(ParseAmountError::OutOfRange(_))),
                "expected {} to be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_split_evenly_of_max_sums_back_exactly() {
        let shares = Amount::MAX.split_evenly(2);
        assert_eq!(shares, vec![amt("5000000000000.00"), amt("4999999999999.99")]);

        let total: Amount = shares.iter().sum();
        assert_eq!(total, Amount::MAX);
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = amt("1.5");
        let b = amt("2.5");

        assert_eq!((a + b).to_string(), "4.00");
        assert_eq!((b - a).to_string(), "1.00");
        assert_eq!((a - b).to_string(), "-1.00");
        assert_eq!((-a).to_string(), "-1.50");
    }

    #[test]
    fn test_sign_helpers() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::ZERO.is_negative());
        assert!(amt("0.01").is_positive());
        assert!(amt("-0.01").is_negative());
        assert_eq!(amt("-7.25").abs(), amt("7.25"));
    }

    #[test]
    fn test_cents_round_trip() {
        assert_eq!(Amount::from_cents(1050), amt("10.50"));
        assert_eq!(amt("10.5").cents(), 1050);
    }

    #[test]
    fn test_sum() {
        let values = [amt("0.10"), amt("0.20"), amt("0.30")];
        let total: Amount = values.iter().sum();
        assert_eq!(total, amt("0.60"));
    }

    #[test]
    fn test_split_evenly_distributes_leftover_cents() {
        let shares = amt("100").split_evenly(3);
        assert_eq!(shares, vec![amt("33.34"), amt("33.33"), amt("33.33")]);

        let total: Amount = shares.iter().sum();
        assert_eq!(total, amt("100"));
    }

    #[test]
    fn test_split_evenly_exact_and_zero_parts() {
        assert_eq!(amt("100").split_evenly(2), vec![amt("50"), amt("50")]);
        assert!(amt("100").split_evenly(0).is_empty());
        assert_eq!(amt("0.01").split_evenly(2), vec![amt("0.01"), amt("0")]);
    }
}

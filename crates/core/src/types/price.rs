//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are Indonesian rupiah. The backend sends prices either as
//! JSON numbers (`25000`) or numeric strings (`"25000.00"`); both decode
//! into the same [`Price`].

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from text.
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A rupiah amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupiah.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole rupiah amount.
    #[must_use]
    pub fn from_rupiah(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Parse a price from text such as `"15000"` or `"15000.50"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s
            .trim()
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Formats as `Rp 25.000` (dot thousands separators, comma decimals).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = rounded.abs();
        let whole = abs.trunc().to_string();
        let fraction = (abs - abs.trunc()).normalize();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        write!(f, "Rp {sign}{grouped}")?;
        if !fraction.is_zero() {
            let digits = fraction.to_string();
            let digits = digits.trim_start_matches("0.");
            write!(f, ",{digits}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Price = serde_json::from_str("25000").unwrap();
        let from_string: Price = serde_json::from_str("\"25000.00\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_times() {
        let price = Price::from_rupiah(12_500);
        assert_eq!(price.times(3), Price::from_rupiah(37_500));
        assert_eq!(price.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_rupiah(1_000), Price::from_rupiah(2_500)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_rupiah(3_500));
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Price::from_rupiah(0).to_string(), "Rp 0");
        assert_eq!(Price::from_rupiah(500).to_string(), "Rp 500");
        assert_eq!(Price::from_rupiah(25_000).to_string(), "Rp 25.000");
        assert_eq!(Price::from_rupiah(1_250_000).to_string(), "Rp 1.250.000");
    }

    #[test]
    fn test_display_fraction() {
        let price = Price::parse("1500.50").unwrap();
        assert_eq!(price.to_string(), "Rp 1.500,5");
        let whole = Price::parse("1500.00").unwrap();
        assert_eq!(whole.to_string(), "Rp 1.500");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse("-10"), Err(PriceError::Negative)));
    }
}

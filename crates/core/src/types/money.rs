//! Monetary amounts in minor units (paise).
//!
//! All stored and transmitted amounts are integers in the smallest currency
//! denomination; rupee values only ever exist as display strings or as
//! operator form input.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a rupee amount from form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    /// The input is not a decimal number.
    #[error("amount must be a number")]
    Invalid,
    /// The input has more than two decimal places.
    #[error("amount cannot have more than two decimal places")]
    TooPrecise,
    /// The amount does not fit in the supported range.
    #[error("amount is out of range")]
    OutOfRange,
}

/// A monetary amount in paise (minor units).
///
/// Arithmetic is exact integer arithmetic; there is no floating point
/// anywhere in the money path.
///
/// ## Display
///
/// Formatting renders the major unit with a `₹` glyph, omitting decimals
/// when the amount is an exact multiple of 100 and showing exactly two
/// decimal places otherwise. Negative amounts keep their sign after the
/// glyph.
///
/// ## Examples
///
/// ```
/// use sprtshop_core::Paise;
///
/// assert_eq!(Paise::new(2000).format_inr(), "₹20");
/// assert_eq!(Paise::new(2050).format_inr(), "₹20.50");
/// assert_eq!(Paise::new(450).format_inr(), "₹4.50");
/// assert_eq!(Paise::new(-1050).format_inr(), "₹-10.50");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Paise(i64);

impl Paise {
    /// Zero paise.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a raw paise value.
    #[must_use]
    pub const fn new(paise: i64) -> Self {
        Self(paise)
    }

    /// Get the underlying paise value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Format as an Indian rupee display string.
    ///
    /// No decimal point when the amount is a whole number of rupees,
    /// exactly two decimal places otherwise.
    #[must_use]
    pub fn format_inr(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let minor = self.0.unsigned_abs();
        let rupees = minor / 100;
        let paise = minor % 100;
        if paise == 0 {
            format!("₹{sign}{rupees}")
        } else {
            format!("₹{sign}{rupees}.{paise:02}")
        }
    }

    /// Parse an operator-entered rupee amount (e.g. `"20"` or `"20.50"`)
    /// into paise.
    ///
    /// # Errors
    ///
    /// Returns [`ParseAmountError`] when the input is not a decimal number,
    /// carries more than two decimal places, or overflows the paise range.
    pub fn parse_rupees(input: &str) -> Result<Self, ParseAmountError> {
        let amount: Decimal = input
            .trim()
            .parse()
            .map_err(|_| ParseAmountError::Invalid)?;
        let minor = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(ParseAmountError::OutOfRange)?;
        if !minor.fract().is_zero() {
            return Err(ParseAmountError::TooPrecise);
        }
        minor.to_i64().map(Self).ok_or(ParseAmountError::OutOfRange)
    }
}

impl fmt::Display for Paise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_inr())
    }
}

impl From<i64> for Paise {
    fn from(paise: i64) -> Self {
        Self(paise)
    }
}

impl From<Paise> for i64 {
    fn from(amount: Paise) -> Self {
        amount.0
    }
}

impl Add for Paise {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Paise {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Paise {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * i64::from(quantity))
    }
}

impl Sum for Paise {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|amount| amount.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_rupee_amounts_have_no_decimal_point() {
        assert_eq!(Paise::new(0).format_inr(), "₹0");
        assert_eq!(Paise::new(100).format_inr(), "₹1");
        assert_eq!(Paise::new(2000).format_inr(), "₹20");
        assert_eq!(Paise::new(1000).format_inr(), "₹10");
    }

    #[test]
    fn fractional_amounts_have_exactly_two_decimal_places() {
        assert_eq!(Paise::new(450).format_inr(), "₹4.50");
        assert_eq!(Paise::new(2005).format_inr(), "₹20.05");
        assert_eq!(Paise::new(99).format_inr(), "₹0.99");
        assert_eq!(Paise::new(1).format_inr(), "₹0.01");
    }

    #[test]
    fn decimal_point_present_iff_not_multiple_of_hundred() {
        for amount in [0_i64, 1, 50, 99, 100, 101, 450, 1000, 123_456_789] {
            let formatted = Paise::new(amount).format_inr();
            assert_eq!(
                formatted.contains('.'),
                amount % 100 != 0,
                "unexpected formatting for {amount}: {formatted}"
            );
        }
    }

    #[test]
    fn negative_amounts_pass_through_with_sign() {
        assert_eq!(Paise::new(-1050).format_inr(), "₹-10.50");
        assert_eq!(Paise::new(-100).format_inr(), "₹-1");
        assert_eq!(Paise::new(-50).format_inr(), "₹-0.50");
    }

    #[test]
    fn parse_rupees_accepts_whole_and_two_decimal_forms() {
        assert_eq!(Paise::parse_rupees("20"), Ok(Paise::new(2000)));
        assert_eq!(Paise::parse_rupees("20.50"), Ok(Paise::new(2050)));
        assert_eq!(Paise::parse_rupees("  4.5 "), Ok(Paise::new(450)));
        assert_eq!(Paise::parse_rupees("0.01"), Ok(Paise::new(1)));
    }

    #[test]
    fn parse_rupees_rejects_garbage_and_excess_precision() {
        assert_eq!(Paise::parse_rupees("abc"), Err(ParseAmountError::Invalid));
        assert_eq!(Paise::parse_rupees(""), Err(ParseAmountError::Invalid));
        assert_eq!(
            Paise::parse_rupees("1.005"),
            Err(ParseAmountError::TooPrecise)
        );
    }

    #[test]
    fn arithmetic_is_exact() {
        let unit = Paise::new(150);
        assert_eq!(unit * 3, Paise::new(450));
        assert_eq!(Paise::new(500) * 2 + Paise::new(450), Paise::new(1450));
        let total: Paise = [Paise::new(100), Paise::new(250)].into_iter().sum();
        assert_eq!(total, Paise::new(350));
    }
}

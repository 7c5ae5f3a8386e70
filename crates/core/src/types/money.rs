//! Fixed-point money representation using decimal arithmetic.
//!
//! Product unit prices arrive as `f64` (that is how product records store
//! them); order totals must never be carried as floating point. [`Money`]
//! converts once, at the boundary, into a two-decimal-place [`Decimal`]
//! and everything downstream stays exact.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur constructing a [`Money`] value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The floating-point input was NaN or infinite.
    #[error("amount is not a finite number")]
    NotFinite,
    /// The amount does not fit in a `Decimal`.
    #[error("amount is out of range")]
    OutOfRange,
}

/// A currency amount with two decimal places.
///
/// Internally a [`Decimal`], serialized as a string (e.g. `"200.00"`) so
/// precision survives JSON round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wrap a decimal amount, normalizing to two decimal places.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut amount = amount.round_dp(2);
        // Pin the scale so "200" and "200.00" serialize identically.
        amount.rescale(2);
        Self(amount)
    }

    /// Convert a floating-point unit price into an exact amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NotFinite`] for NaN/infinite inputs and
    /// [`MoneyError::OutOfRange`] for values a `Decimal` cannot hold.
    pub fn from_f64(amount: f64) -> Result<Self, MoneyError> {
        if !amount.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        let decimal = Decimal::from_f64_retain(amount).ok_or(MoneyError::OutOfRange)?;
        Ok(Self::new(decimal))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

}

/// Display as a US-style currency string: `$1,234.56`.
///
/// This is a presentation derivative only; the decimal amount is the
/// source of truth.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixed = format!("{:.2}", self.0.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{sign}${grouped}.{frac_part}")
    }
}

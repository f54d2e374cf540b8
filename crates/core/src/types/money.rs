//! Currency amounts using decimal arithmetic.
//!
//! All pricing math in Delizio goes through [`Money`], which wraps a
//! [`Decimal`] so repeated additions never accumulate binary floating-point
//! error. Amounts keep full precision internally and are rounded to cents only
//! for display.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Money`] amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    /// The input string is empty.
    #[error("amount cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// An amount of money in the store's currency (US dollars).
///
/// ## Examples
///
/// ```
/// use delizio_core::Money;
///
/// let price = Money::from_cents(1299);
/// let line = price * 2;
/// assert_eq!(line.to_string(), "$25.98");
/// assert_eq!((Money::ZERO - price).to_string(), "-$12.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create an amount from whole dollars.
    #[must_use]
    pub fn from_dollars(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }

    /// The underlying decimal amount, unrounded.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// `percent`% of this amount, e.g. `percent(15)` of $60 is $9.
    #[must_use]
    pub fn percent(self, percent: Decimal) -> Self {
        Self(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The amount rounded to cents, midpoint away from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Whole dollars, rounded toward negative infinity.
    ///
    /// Saturates at the `i64` bounds.
    #[must_use]
    pub fn floor_dollars(self) -> i64 {
        self.0.floor().to_i64().unwrap_or(if self.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Parse a dollar amount such as `12.99` or `$12.99`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not a decimal number.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        digits
            .parse::<Decimal>()
            .map(Self)
            .map_err(|_| MoneyParseError::Invalid(s.to_owned()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded().0;
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-${:.2}", rounded.abs())
        } else {
            write!(f, "${:.2}", rounded.abs())
        }
    }
}

impl std::str::FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Money::from_cents(1299).to_string(), "$12.99");
        assert_eq!(Money::from_dollars(5).to_string(), "$5.00");
        assert_eq!(Money::new(Decimal::new(12_345, 3)).to_string(), "$12.35");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Money::from_cents(-100).to_string(), "-$1.00");
        // Rounds to zero, so no sign.
        assert_eq!(Money::new(Decimal::new(-1, 3)).to_string(), "$0.00");
    }

    #[test]
    fn test_repeated_addition_is_exact() {
        let dime = Money::from_cents(10);
        let total: Money = std::iter::repeat_n(dime, 10).sum();
        assert_eq!(total, Money::from_dollars(1));
    }

    #[test]
    fn test_percent() {
        assert_eq!(
            Money::from_dollars(60).percent(Decimal::from(15)),
            Money::from_dollars(9)
        );
        assert_eq!(
            Money::from_dollars(25).percent(Decimal::TEN),
            Money::from_cents(250)
        );
    }

    #[test]
    fn test_floor_dollars() {
        assert_eq!(Money::from_cents(3797).floor_dollars(), 37);
        assert_eq!(Money::from_cents(-50).floor_dollars(), -1);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("12.99").unwrap(), Money::from_cents(1299));
        assert_eq!(Money::parse(" $3 ").unwrap(), Money::from_dollars(3));
        assert_eq!(Money::parse(""), Err(MoneyParseError::Empty));
        assert!(matches!(
            Money::parse("twelve"),
            Err(MoneyParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_serde_uses_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(599)).unwrap();
        assert_eq!(json, "\"5.99\"");
        let parsed: Money = serde_json::from_str("\"5.99\"").unwrap();
        assert_eq!(parsed, Money::from_cents(599));
    }
}

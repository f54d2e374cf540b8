//! Coupon eligibility checks.
//!
//! Eligibility is checked once, when a customer applies a code. The pricing
//! calculator never re-validates an applied coupon.

use thiserror::Error;

use delizio_core::Money;

use crate::catalog::{Catalog, Coupon};

/// Why a coupon code was not accepted.
///
/// The `Display` text is shown to the customer as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    /// No coupon in the catalog has this code.
    #[error("Invalid coupon code")]
    InvalidCode,

    /// The cart subtotal is below the coupon's minimum.
    #[error("Minimum order of {minimum} required")]
    MinimumNotMet {
        /// The coupon's minimum subtotal.
        minimum: Money,
    },
}

/// Check `code` against the catalog for a cart worth `subtotal`.
///
/// # Errors
///
/// Returns `CouponError::InvalidCode` if no coupon matches (case-insensitive).
/// Returns `CouponError::MinimumNotMet` if `subtotal` is below the minimum.
pub fn redeem_coupon<'a>(
    catalog: &'a Catalog,
    code: &str,
    subtotal: Money,
) -> Result<&'a Coupon, CouponError> {
    let coupon = catalog.coupon(code).ok_or(CouponError::InvalidCode)?;
    if subtotal < coupon.min_order {
        return Err(CouponError::MinimumNotMet {
            minimum: coupon.min_order,
        });
    }
    Ok(coupon)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome10_boundary() {
        let catalog = Catalog::builtin();

        let err = redeem_coupon(&catalog, "WELCOME10", Money::from_cents(2499)).unwrap_err();
        assert_eq!(
            err,
            CouponError::MinimumNotMet {
                minimum: Money::from_dollars(25)
            }
        );
        assert_eq!(err.to_string(), "Minimum order of $25.00 required");

        let coupon = redeem_coupon(&catalog, "WELCOME10", Money::from_cents(2500)).unwrap();
        assert_eq!(coupon.code, "WELCOME10");
    }

    #[test]
    fn test_lowercase_code_accepted() {
        let catalog = Catalog::builtin();
        let coupon = redeem_coupon(&catalog, "save15", Money::from_dollars(60)).unwrap();
        assert_eq!(coupon.code, "SAVE15");
    }

    #[test]
    fn test_unknown_code() {
        let catalog = Catalog::builtin();
        let err = redeem_coupon(&catalog, "BOGUS", Money::from_dollars(500)).unwrap_err();
        assert_eq!(err, CouponError::InvalidCode);
        assert_eq!(err.to_string(), "Invalid coupon code");
    }
}

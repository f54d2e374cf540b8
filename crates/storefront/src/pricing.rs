//! Order pricing.
//!
//! Pure functions over [`Money`]: no side effects, same inputs give the same
//! outputs. An applied coupon is never re-validated here, so a discount keeps
//! applying after the cart shrinks below the coupon's minimum. Totals are not
//! clamped at zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use delizio_core::{Money, OrderType};

use crate::cart::CartState;
use crate::catalog::Coupon;

/// Delivery pricing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat fee charged on delivery orders below the threshold.
    pub delivery_fee: Money,
    /// Delivery is free when the subtotal reaches this amount.
    pub free_delivery_threshold: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            delivery_fee: Money::from_cents(599),
            free_delivery_threshold: Money::from_dollars(50),
        }
    }
}

/// Coupon discount on `subtotal`; zero without a coupon.
#[must_use]
pub fn discount_amount(subtotal: Money, coupon: Option<&Coupon>) -> Money {
    coupon.map_or(Money::ZERO, |c| subtotal.percent(c.discount_percent))
}

/// Delivery fee for an order of `order_type` worth `subtotal`.
#[must_use]
pub fn delivery_fee(subtotal: Money, order_type: OrderType, config: &PricingConfig) -> Money {
    match order_type {
        OrderType::Pickup => Money::ZERO,
        OrderType::Delivery if subtotal >= config.free_delivery_threshold => Money::ZERO,
        OrderType::Delivery => config.delivery_fee,
    }
}

/// `subtotal + delivery_fee + tip - discount`, which may be negative.
#[must_use]
pub fn total(subtotal: Money, delivery_fee: Money, tip: Money, discount: Money) -> Money {
    subtotal + delivery_fee + tip - discount
}

/// Errors from building a [`Tip`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TipError {
    #[error("tip cannot be negative")]
    Negative,

    #[error("unsupported tip percentage: {0}% (choose 15, 18 or 20)")]
    UnsupportedPercent(u8),

    #[error("tip cannot exceed {maximum}")]
    TooLarge { maximum: Money },
}

/// Gratuity chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Tip {
    #[default]
    None,
    /// A quick-pick flat amount.
    Flat(Money),
    /// One of [`Tip::PRESET_PERCENTAGES`] of the subtotal.
    Percent(u8),
    /// Any non-negative amount typed in by the customer.
    Custom(Money),
}

impl Tip {
    /// Percentages offered as presets.
    pub const PRESET_PERCENTAGES: [u8; 3] = [15, 18, 20];

    /// Flat quick-pick amounts, in whole dollars.
    pub const QUICK_AMOUNTS: [i64; 4] = [0, 2, 3, 5];

    /// Largest flat or custom tip accepted.
    pub const MAX_AMOUNT: Money = Money::new(Decimal::ONE_THOUSAND);

    fn check_amount(amount: Money) -> Result<Money, TipError> {
        if amount.is_negative() {
            return Err(TipError::Negative);
        }
        if amount > Self::MAX_AMOUNT {
            return Err(TipError::TooLarge {
                maximum: Self::MAX_AMOUNT,
            });
        }
        Ok(amount)
    }

    /// A flat tip.
    ///
    /// # Errors
    ///
    /// Returns `TipError::Negative` for amounts below zero and
    /// `TipError::TooLarge` above [`Tip::MAX_AMOUNT`].
    pub fn flat(amount: Money) -> Result<Self, TipError> {
        let amount = Self::check_amount(amount)?;
        Ok(if amount.is_zero() {
            Self::None
        } else {
            Self::Flat(amount)
        })
    }

    /// A preset percentage tip.
    ///
    /// # Errors
    ///
    /// Returns `TipError::UnsupportedPercent` unless `percent` is a preset.
    pub fn percent(percent: u8) -> Result<Self, TipError> {
        if Self::PRESET_PERCENTAGES.contains(&percent) {
            Ok(Self::Percent(percent))
        } else {
            Err(TipError::UnsupportedPercent(percent))
        }
    }

    /// A custom tip.
    ///
    /// # Errors
    ///
    /// Returns `TipError::Negative` for amounts below zero and
    /// `TipError::TooLarge` above [`Tip::MAX_AMOUNT`].
    pub fn custom(amount: Money) -> Result<Self, TipError> {
        Self::check_amount(amount).map(Self::Custom)
    }

    /// Check a deserialized tip against the same rules as the constructors.
    ///
    /// # Errors
    ///
    /// Returns the error the matching constructor would have returned.
    pub fn validate(self) -> Result<Self, TipError> {
        match self {
            Self::None => Ok(self),
            Self::Flat(amount) => Self::flat(amount),
            Self::Percent(percent) => Self::percent(percent),
            Self::Custom(amount) => Self::custom(amount),
        }
    }

    /// Tip amount for an order worth `subtotal`.
    #[must_use]
    pub fn amount(self, subtotal: Money) -> Money {
        match self {
            Self::None => Money::ZERO,
            Self::Flat(amount) | Self::Custom(amount) => amount,
            Self::Percent(percent) => subtotal.percent(Decimal::from(percent)),
        }
    }
}

/// Full cost breakdown shown at review time and stored on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub discount: Money,
    pub tip: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// Price `cart` for the given order type and tip.
    #[must_use]
    pub fn compute(cart: &CartState, order_type: OrderType, tip: Tip, config: &PricingConfig) -> Self {
        let subtotal = cart.subtotal();
        let delivery_fee = delivery_fee(subtotal, order_type, config);
        let discount = discount_amount(subtotal, cart.coupon.as_ref());
        let tip = tip.amount(subtotal);
        Self {
            subtotal,
            delivery_fee,
            discount,
            tip,
            total: total(subtotal, delivery_fee, tip, discount),
        }
    }
}

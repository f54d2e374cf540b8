//! Placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use delizio_core::{Money, OrderId, OrderStatus, OrderType, PaymentMethod};

use crate::cart::CartLineItem;
use crate::pricing::PriceBreakdown;

/// Where a delivery order goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub phone: String,
    /// Free-form note for the driver.
    #[serde(default)]
    pub instructions: String,
}

impl DeliveryInfo {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("address", &self.address),
            ("city", &self.city),
            ("zip_code", &self.zip_code),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// An order as placed at checkout.
///
/// Everything except `status` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Cart lines at the moment of placement.
    pub items: Vec<CartLineItem>,
    /// Subtotal, fee, discount, tip and total.
    #[serde(flatten)]
    pub pricing: PriceBreakdown,
    /// Code of the coupon applied, if any.
    #[serde(default)]
    pub coupon_code: Option<String>,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub estimated_time: String,
    pub created_at: DateTime<Utc>,
    /// Present iff `order_type` is delivery.
    pub delivery_info: Option<DeliveryInfo>,
    pub payment_method: PaymentMethod,
}

impl Order {
    #[must_use]
    pub const fn total(&self) -> Money {
        self.pricing.total
    }

    #[must_use]
    pub const fn tip(&self) -> Money {
        self.pricing.tip
    }

    /// Total number of units ordered.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

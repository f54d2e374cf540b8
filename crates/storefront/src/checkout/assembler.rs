//! Builds the immutable [`Order`] record from the cart and checkout choices.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use delizio_core::{OrderId, OrderStatus, OrderType, PaymentMethod};

use crate::cart::CartState;
use crate::models::{DeliveryInfo, Order};
use crate::pricing::{PriceBreakdown, PricingConfig, Tip};

/// Issues timestamp-based order IDs.
///
/// IDs are the creation time in milliseconds, bumped when needed so each ID
/// is strictly greater than the previous one.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    last: AtomicI64,
}

impl OrderIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// The ID for an order created at `now`.
    pub fn next(&self, now: DateTime<Utc>) -> OrderId {
        let millis = now.timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = millis.max(previous.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return OrderId::new(candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}

/// Everything the customer chose during checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSelections {
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub tip: Tip,
    /// Used only for delivery orders.
    pub delivery_info: DeliveryInfo,
}

/// Snapshot `cart` into a new confirmed order.
#[must_use]
pub fn assemble_order(
    id: OrderId,
    cart: &CartState,
    selections: &OrderSelections,
    pricing: &PricingConfig,
    now: DateTime<Utc>,
) -> Order {
    let order_type = selections.order_type;
    Order {
        id,
        items: cart.items.clone(),
        pricing: PriceBreakdown::compute(cart, order_type, selections.tip, pricing),
        coupon_code: cart.coupon.as_ref().map(|c| c.code.clone()),
        order_type,
        status: OrderStatus::Confirmed,
        estimated_time: order_type.estimated_time().to_string(),
        created_at: now,
        delivery_info: (order_type == OrderType::Delivery)
            .then(|| selections.delivery_info.clone()),
        payment_method: selections.payment_method,
    }
}

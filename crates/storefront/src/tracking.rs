//! Order status tracking.

use serde::Serialize;
use thiserror::Error;

use delizio_core::{OrderId, OrderStatus, OrderType};

use crate::models::Order;

/// Errors from advancing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order {id} is already {status}")]
    AlreadyFinal { id: OrderId, status: OrderStatus },
}

/// One step of the progress indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    pub status: OrderStatus,
    pub label: &'static str,
    /// Reached at or before the current status.
    pub completed: bool,
    pub current: bool,
}

/// Progress view of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTracking {
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub estimated_time: String,
    pub steps: Vec<TrackingStep>,
}

impl OrderTracking {
    #[must_use]
    pub fn for_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            order_type: order.order_type,
            status: order.status,
            estimated_time: order.estimated_time.clone(),
            steps: tracking_steps(order),
        }
    }
}

/// Customer-facing label for `status`.
#[must_use]
pub const fn status_label(status: OrderStatus, order_type: OrderType) -> &'static str {
    match (status, order_type) {
        (OrderStatus::Confirmed, _) => "Order Confirmed",
        (OrderStatus::Preparing, _) => "Preparing",
        (OrderStatus::Ready, OrderType::Delivery) => "Ready for Delivery",
        (OrderStatus::Ready, OrderType::Pickup) => "Ready for Pickup",
        (OrderStatus::Out, _) => "Out for Delivery",
        (OrderStatus::Delivered, _) => "Delivered",
        (OrderStatus::Completed, _) => "Completed",
    }
}

/// Labelled progression for `order`, flagging completed and current steps.
///
/// A status outside the order type's progression marks only the first step.
#[must_use]
pub fn tracking_steps(order: &Order) -> Vec<TrackingStep> {
    let current = order.status.step_index(order.order_type).unwrap_or(0);
    order
        .order_type
        .progression()
        .iter()
        .enumerate()
        .map(|(index, &status)| TrackingStep {
            status,
            label: status_label(status, order.order_type),
            completed: index <= current,
            current: index == current,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use delizio_core::{Money, PaymentMethod};

    use super::*;
    use crate::pricing::PriceBreakdown;

    fn order(order_type: OrderType, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(1),
            items: Vec::new(),
            pricing: PriceBreakdown {
                subtotal: Money::ZERO,
                delivery_fee: Money::ZERO,
                discount: Money::ZERO,
                tip: Money::ZERO,
                total: Money::ZERO,
            },
            coupon_code: None,
            order_type,
            status,
            estimated_time: order_type.estimated_time().to_string(),
            created_at: Utc::now(),
            delivery_info: None,
            payment_method: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_delivery_labels() {
        let steps = tracking_steps(&order(OrderType::Delivery, OrderStatus::Confirmed));
        let labels: Vec<_> = steps.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            [
                "Order Confirmed",
                "Preparing",
                "Ready for Delivery",
                "Out for Delivery",
                "Delivered"
            ]
        );
    }

    #[test]
    fn test_pickup_labels() {
        let steps = tracking_steps(&order(OrderType::Pickup, OrderStatus::Confirmed));
        let labels: Vec<_> = steps.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            ["Order Confirmed", "Preparing", "Ready for Pickup", "Completed"]
        );
    }

    #[test]
    fn test_current_step_flags() {
        let steps = tracking_steps(&order(OrderType::Delivery, OrderStatus::Ready));
        let completed = steps.iter().filter(|s| s.completed).count();
        assert_eq!(completed, 3);
        let current: Vec<_> = steps.iter().filter(|s| s.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].status, OrderStatus::Ready);
    }

    #[test]
    fn test_error_messages() {
        let err = TrackingError::AlreadyFinal {
            id: OrderId::new(9),
            status: OrderStatus::Delivered,
        };
        assert_eq!(err.to_string(), "order 9 is already delivered");
    }
}

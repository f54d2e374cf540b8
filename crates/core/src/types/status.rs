//! Status enums for orders and checkout selections.
//!
//! All enums serialize in lowercase so stored order history stays readable
//! and stable across releases.

use serde::{Deserialize, Serialize};

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Delivered to the customer's address.
    Delivery,
    /// Collected at the restaurant.
    Pickup,
}

impl OrderType {
    /// Estimated time shown to the customer when the order is placed.
    #[must_use]
    pub const fn estimated_time(self) -> &'static str {
        match self {
            Self::Delivery => "30-45 minutes",
            Self::Pickup => "15-20 minutes",
        }
    }

    /// Statuses an order of this type moves through, in order.
    #[must_use]
    pub const fn progression(self) -> &'static [OrderStatus] {
        match self {
            Self::Delivery => &[
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::Out,
                OrderStatus::Delivered,
            ],
            Self::Pickup => &[
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::Completed,
            ],
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivery => write!(f, "delivery"),
            Self::Pickup => write!(f, "pickup"),
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(format!("invalid order type: {s}")),
        }
    }
}

/// Fulfillment status of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted by the restaurant. Every order starts here.
    #[default]
    Confirmed,
    Preparing,
    Ready,
    /// Out for delivery (delivery orders only).
    Out,
    /// Final status for delivery orders.
    Delivered,
    /// Final status for pickup orders.
    Completed,
}

impl OrderStatus {
    /// The status following this one for the given order type.
    ///
    /// Returns `None` at the end of the progression, or when this status is
    /// not part of the order type's progression at all.
    #[must_use]
    pub fn next(self, order_type: OrderType) -> Option<Self> {
        let steps = order_type.progression();
        let index = self.step_index(order_type)?;
        steps.get(index + 1).copied()
    }

    /// Position of this status in the order type's progression.
    #[must_use]
    pub fn step_index(self, order_type: OrderType) -> Option<usize> {
        order_type.progression().iter().position(|s| *s == self)
    }

    /// Whether the order has reached the end of its progression.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Preparing => write!(f, "preparing"),
            Self::Ready => write!(f, "ready"),
            Self::Out => write!(f, "out"),
            Self::Delivered => write!(f, "delivered"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "out" => Ok(Self::Out),
            "delivered" => Ok(Self::Delivered),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit card.
    #[default]
    Card,
    Paypal,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit Card",
            Self::Paypal => "PayPal",
            Self::Cash => "Cash on Delivery",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Paypal => write!(f, "paypal"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

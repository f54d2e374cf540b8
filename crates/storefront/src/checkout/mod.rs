//! Checkout state machine.
//!
//! ```text
//! SelectingOrderType -> SelectingPayment -> ReviewingOrder -> Placing -> Placed
//! ```
//!
//! `back` moves one step toward the start from the two middle steps. Placing
//! is entered once per checkout: a second attempt while payment is in flight
//! is rejected, so at most one order comes out of a session. A failed payment
//! returns to `ReviewingOrder` with the cart untouched.

mod assembler;

pub use assembler::{OrderIdGenerator, OrderSelections, assemble_order};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use delizio_core::{OrderId, OrderType, PaymentMethod};

use crate::cart::CartState;
use crate::models::{DeliveryInfo, Order, User};
use crate::pricing::{PriceBreakdown, PricingConfig, Tip, TipError};
use crate::services::account::AccountError;
use crate::services::payment::{PaymentError, PaymentRequest};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    SelectingOrderType,
    SelectingPayment,
    ReviewingOrder,
    /// Payment is in flight.
    Placing,
    Placed,
}

impl CheckoutStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelectingOrderType => "selecting_order_type",
            Self::SelectingPayment => "selecting_payment",
            Self::ReviewingOrder => "reviewing_order",
            Self::Placing => "placing",
            Self::Placed => "placed",
        }
    }

    /// Step number shown in the progress bar (1-indexed).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::SelectingOrderType => 1,
            Self::SelectingPayment => 2,
            Self::ReviewingOrder => 3,
            Self::Placing | Self::Placed => 4,
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from checkout transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please choose delivery or pickup")]
    OrderTypeRequired,

    /// Delivery orders need every address field.
    #[error("Please fill in: {}", .0.join(", "))]
    MissingDeliveryInfo(Vec<&'static str>),

    /// The action is not available at the current step.
    #[error("cannot {action} while {step}")]
    InvalidTransition {
        step: CheckoutStep,
        action: &'static str,
    },

    /// Placing an order needs a signed-in user.
    #[error("Please log in to place your order")]
    LoginRequired,

    #[error("Your order is already being placed")]
    AlreadyPlacing,

    #[error(transparent)]
    Tip(#[from] TipError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Checkout progress for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutSession {
    step: CheckoutStep,
    order_type: Option<OrderType>,
    delivery_info: DeliveryInfo,
    payment_method: PaymentMethod,
    tip: Tip,
    /// The order awaiting payment while `Placing`.
    #[serde(skip)]
    pending: Option<Order>,
    placed_order: Option<OrderId>,
}

impl CheckoutSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn order_type(&self) -> Option<OrderType> {
        self.order_type
    }

    #[must_use]
    pub const fn delivery_info(&self) -> &DeliveryInfo {
        &self.delivery_info
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    #[must_use]
    pub const fn tip(&self) -> Tip {
        self.tip
    }

    /// ID of the order this checkout produced, once `Placed`.
    #[must_use]
    pub const fn placed_order(&self) -> Option<OrderId> {
        self.placed_order
    }

    /// Fill blank delivery fields from the user's saved address.
    pub fn prefill_delivery(&mut self, user: &User) {
        let defaults = user.delivery_defaults();
        let info = &mut self.delivery_info;
        for (field, default) in [
            (&mut info.address, defaults.address),
            (&mut info.city, defaults.city),
            (&mut info.zip_code, defaults.zip_code),
            (&mut info.phone, defaults.phone),
        ] {
            if field.trim().is_empty() {
                *field = default;
            }
        }
    }

    /// Choose delivery or pickup, optionally replacing the delivery details.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransition` outside `SelectingOrderType`.
    pub fn select_order_type(
        &mut self,
        order_type: OrderType,
        delivery_info: Option<DeliveryInfo>,
    ) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::SelectingOrderType, "choose an order type")?;
        self.order_type = Some(order_type);
        if let Some(info) = delivery_info {
            self.delivery_info = info;
        }
        debug!(%order_type, "Order type selected");
        Ok(())
    }

    /// Move to payment selection.
    ///
    /// # Errors
    ///
    /// Fails if the cart is empty, no order type is chosen, or a delivery
    /// order is missing address, city, zip code or phone.
    pub fn continue_to_payment(&mut self, cart: &CartState) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::SelectingOrderType, "continue to payment")?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let order_type = self.order_type.ok_or(CheckoutError::OrderTypeRequired)?;
        if order_type == OrderType::Delivery {
            let missing = self.delivery_info.missing_fields();
            if !missing.is_empty() {
                return Err(CheckoutError::MissingDeliveryInfo(missing));
            }
        }
        self.step = CheckoutStep::SelectingPayment;
        Ok(())
    }

    /// Choose how to pay and how much to tip.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Tip` for an invalid tip and
    /// `CheckoutError::InvalidTransition` outside `SelectingPayment`.
    pub fn select_payment(&mut self, method: PaymentMethod, tip: Tip) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::SelectingPayment, "choose a payment method")?;
        self.tip = tip.validate()?;
        self.payment_method = method;
        debug!(%method, ?tip, "Payment selected");
        Ok(())
    }

    /// Move to the order review.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransition` outside `SelectingPayment`.
    pub fn continue_to_review(&mut self) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::SelectingPayment, "continue to review")?;
        self.step = CheckoutStep::ReviewingOrder;
        Ok(())
    }

    /// Go back one step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransition` from the first step and
    /// once placement has started.
    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.step = match self.step {
            CheckoutStep::SelectingPayment => CheckoutStep::SelectingOrderType,
            CheckoutStep::ReviewingOrder => CheckoutStep::SelectingPayment,
            step => {
                return Err(CheckoutError::InvalidTransition {
                    step,
                    action: "go back",
                });
            }
        };
        Ok(self.step)
    }

    /// Price `cart` with the current selections. `None` until an order type
    /// is chosen.
    #[must_use]
    pub fn breakdown(&self, cart: &CartState, pricing: &PricingConfig) -> Option<PriceBreakdown> {
        self.order_type
            .map(|order_type| PriceBreakdown::compute(cart, order_type, self.tip, pricing))
    }

    /// Enter `Placing`: assemble the order and return the charge to capture.
    ///
    /// Without a signed-in user nothing changes and the caller should send
    /// the customer to log in.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AlreadyPlacing` while a placement is in flight,
    /// `CheckoutError::LoginRequired` when `user` is `None`, and
    /// `CheckoutError::InvalidTransition` outside `ReviewingOrder`.
    pub fn begin_placement(
        &mut self,
        cart: &CartState,
        user: Option<&User>,
        pricing: &PricingConfig,
        id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<PaymentRequest, CheckoutError> {
        if self.step == CheckoutStep::Placing {
            return Err(CheckoutError::AlreadyPlacing);
        }
        self.expect_step(CheckoutStep::ReviewingOrder, "place the order")?;
        if user.is_none() {
            return Err(CheckoutError::LoginRequired);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let order_type = self.order_type.ok_or(CheckoutError::OrderTypeRequired)?;

        let selections = OrderSelections {
            order_type,
            payment_method: self.payment_method,
            tip: self.tip,
            delivery_info: self.delivery_info.clone(),
        };
        let order = assemble_order(id, cart, &selections, pricing, now);
        let request = PaymentRequest {
            order_id: order.id,
            amount: order.total(),
            method: order.payment_method,
        };

        info!(order_id = %order.id, total = %order.total(), "Placing order");
        self.pending = Some(order);
        self.step = CheckoutStep::Placing;
        Ok(request)
    }

    /// The order awaiting payment, if placement is in flight.
    #[must_use]
    pub const fn pending_order(&self) -> Option<&Order> {
        self.pending.as_ref()
    }

    /// Payment succeeded: hand back the order and move to `Placed`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidTransition` unless `Placing`.
    pub fn complete_placement(&mut self) -> Result<Order, CheckoutError> {
        let order = match (self.step, self.pending.take()) {
            (CheckoutStep::Placing, Some(order)) => order,
            (step, _) => {
                return Err(CheckoutError::InvalidTransition {
                    step,
                    action: "complete placement",
                });
            }
        };
        self.placed_order = Some(order.id);
        self.step = CheckoutStep::Placed;
        info!(order_id = %order.id, "Order placed");
        Ok(order)
    }

    /// Payment or recording failed: drop the pending order and return to
    /// the review step.
    pub fn abort_placement(&mut self) {
        if let Some(order) = self.pending.take() {
            warn!(order_id = %order.id, "Order placement aborted");
        }
        if self.step == CheckoutStep::Placing {
            self.step = CheckoutStep::ReviewingOrder;
        }
    }

    /// Start a fresh checkout. Ignored while payment is in flight.
    pub fn restart(&mut self) {
        if self.step != CheckoutStep::Placing {
            *self = Self::new();
        }
    }

    fn expect_step(&self, step: CheckoutStep, action: &'static str) -> Result<(), CheckoutError> {
        if self.step == step {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                step: self.step,
                action,
            })
        }
    }
}

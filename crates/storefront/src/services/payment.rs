//! Payment capture.
//!
//! No real gateway is integrated. [`MockPaymentProcessor`] waits a fixed delay
//! and approves, which is what the storefront has always done; tests inject
//! processors that fail.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use delizio_core::{Money, OrderId, PaymentMethod};

/// Errors from capturing a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The processor refused the charge.
    #[error("payment declined: {0}")]
    Declined(String),

    /// The processor could not be reached or failed internally.
    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
}

/// A charge to capture for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
}

/// Confirmation of a captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub order_id: OrderId,
    pub amount: Money,
    pub reference: String,
}

/// Captures payment for an order.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Capture `request.amount` using `request.method`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the charge is declined or cannot be made.
    async fn capture(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError>;
}

/// Approves every charge after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct MockPaymentProcessor {
    delay: Duration,
}

impl MockPaymentProcessor {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A processor that approves immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for MockPaymentProcessor {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    #[instrument(skip(self), fields(order_id = %request.order_id, amount = %request.amount))]
    async fn capture(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!(method = %request.method, "Mock payment approved");
        Ok(PaymentReceipt {
            order_id: request.order_id,
            amount: request.amount,
            reference: format!("mock-{}", request.order_id),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest {
            order_id: OrderId::new(1_700_000_000_000),
            amount: Money::from_cents(3797),
            method: PaymentMethod::Card,
        }
    }

    #[tokio::test]
    async fn test_mock_processor_approves() {
        let receipt = MockPaymentProcessor::instant()
            .capture(&request())
            .await
            .unwrap();
        assert_eq!(receipt.amount, Money::from_cents(3797));
        assert_eq!(receipt.reference, "mock-1700000000000");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_processor_waits_for_delay() {
        let processor = MockPaymentProcessor::new(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        processor.capture(&request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}

//! One customer session: cart, signed-in user and checkout progress.
//!
//! The session is owned by whoever drives it (the HTTP layer keeps it behind
//! a `tokio::sync::Mutex`). Everything here is synchronous except
//! [`place_order`], which releases the lock while payment is captured.

use std::sync::{Arc, Weak};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use delizio_core::{OrderId, OrderType, PaymentMethod};

use crate::cart::CartStore;
use crate::checkout::{CheckoutError, CheckoutSession, CheckoutStep, OrderIdGenerator};
use crate::models::{DeliveryInfo, Order};
use crate::persistence::{KeyValueStore, MemoryStore};
use crate::pricing::{PriceBreakdown, PricingConfig, Tip};
use crate::services::account::{AccountError, AccountStore};
use crate::services::payment::{PaymentError, PaymentProcessor, PaymentReceipt, PaymentRequest};

/// State for a single storefront user.
#[derive(Debug)]
pub struct StorefrontSession {
    cart: CartStore,
    accounts: AccountStore,
    checkout: CheckoutSession,
    pricing: PricingConfig,
    order_ids: OrderIdGenerator,
    /// Liveness of the ticket handed out by the current placement.
    in_flight: Weak<OrderId>,
}

/// Handed out when a placement begins and held until it finishes.
///
/// If the ticket is dropped while the checkout is still `Placing`, the next
/// checkout action returns the session to review.
#[derive(Debug)]
pub struct PlacementTicket(Arc<OrderId>);

impl PlacementTicket {
    /// The order being placed.
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        *self.0
    }
}

impl StorefrontSession {
    #[must_use]
    pub fn new(cart: CartStore, accounts: AccountStore, pricing: PricingConfig) -> Self {
        Self {
            cart,
            accounts,
            checkout: CheckoutSession::new(),
            pricing,
            order_ids: OrderIdGenerator::new(),
            in_flight: Weak::new(),
        }
    }

    /// Restore the cart and user saved in `storage`.
    #[must_use]
    pub fn rehydrate(storage: Arc<dyn KeyValueStore>, pricing: PricingConfig) -> Self {
        Self::new(
            CartStore::rehydrate(Arc::clone(&storage)),
            AccountStore::rehydrate(storage),
            pricing,
        )
    }

    /// A session that keeps nothing after it is dropped.
    #[must_use]
    pub fn ephemeral(pricing: PricingConfig) -> Self {
        Self::rehydrate(Arc::new(MemoryStore::new()), pricing)
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub const fn accounts_mut(&mut self) -> &mut AccountStore {
        &mut self.accounts
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutSession {
        &self.checkout
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Current cost breakdown, once an order type is chosen.
    #[must_use]
    pub fn breakdown(&self) -> Option<PriceBreakdown> {
        self.checkout.breakdown(self.cart.state(), &self.pricing)
    }

    /// Choose delivery or pickup. Blank delivery fields are pre-filled from
    /// the signed-in user's address.
    ///
    /// # Errors
    ///
    /// See [`CheckoutSession::select_order_type`].
    pub fn select_order_type(
        &mut self,
        order_type: OrderType,
        delivery_info: Option<DeliveryInfo>,
    ) -> Result<(), CheckoutError> {
        self.reclaim_abandoned();
        self.checkout.select_order_type(order_type, delivery_info)?;
        if let Some(user) = self.accounts.current_user() {
            self.checkout.prefill_delivery(user);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// See [`CheckoutSession::continue_to_payment`].
    pub fn continue_to_payment(&mut self) -> Result<(), CheckoutError> {
        self.reclaim_abandoned();
        self.checkout.continue_to_payment(self.cart.state())
    }

    /// Choose payment and tip, then move to the review step.
    ///
    /// # Errors
    ///
    /// See [`CheckoutSession::select_payment`].
    pub fn choose_payment(&mut self, method: PaymentMethod, tip: Tip) -> Result<(), CheckoutError> {
        self.reclaim_abandoned();
        self.checkout.select_payment(method, tip)?;
        self.checkout.continue_to_review()
    }

    /// # Errors
    ///
    /// See [`CheckoutSession::back`].
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        self.reclaim_abandoned();
        self.checkout.back().map(|_| ())
    }

    pub fn restart_checkout(&mut self) {
        self.reclaim_abandoned();
        self.checkout.restart();
    }

    /// Return to review if the placement in flight was dropped before it
    /// finished.
    fn reclaim_abandoned(&mut self) {
        if self.checkout.step() == CheckoutStep::Placing && self.in_flight.strong_count() == 0 {
            warn!("Reclaiming checkout from an abandoned placement");
            self.checkout.abort_placement();
        }
    }

    /// Give up on the placement of `order_id` if it is still pending.
    pub fn abandon_placement(&mut self, order_id: OrderId) {
        let pending = self.checkout.pending_order().map(|order| order.id);
        if pending == Some(order_id) {
            self.checkout.abort_placement();
        }
    }

    /// Enter `Placing` and return the charge to capture along with the
    /// ticket that keeps the placement alive.
    ///
    /// # Errors
    ///
    /// See [`CheckoutSession::begin_placement`].
    pub fn begin_placement(&mut self) -> Result<(PaymentRequest, PlacementTicket), CheckoutError> {
        self.reclaim_abandoned();
        let now = Utc::now();
        let id = self.order_ids.next(now);
        let request = self.checkout.begin_placement(
            self.cart.state(),
            self.accounts.current_user(),
            &self.pricing,
            id,
            now,
        )?;
        let ticket = PlacementTicket(Arc::new(request.order_id));
        self.in_flight = Arc::downgrade(&ticket.0);
        Ok((request, ticket))
    }

    /// Finish a placement once payment has resolved.
    ///
    /// On success the order joins the user's history, loyalty points are
    /// awarded and the cart is emptied. On failure the checkout returns to
    /// review and the cart is left alone.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Payment` if payment failed,
    /// `CheckoutError::Account` if the user signed out meanwhile and
    /// `CheckoutError::InvalidTransition` if `ticket` is not for the pending
    /// order.
    pub fn finish_placement(
        &mut self,
        ticket: PlacementTicket,
        payment: Result<PaymentReceipt, PaymentError>,
    ) -> Result<Order, CheckoutError> {
        if self.checkout.pending_order().map(|order| order.id) != Some(ticket.order_id()) {
            return Err(CheckoutError::InvalidTransition {
                step: self.checkout.step(),
                action: "complete placement",
            });
        }
        let receipt = match payment {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Payment failed");
                self.checkout.abort_placement();
                return Err(e.into());
            }
        };
        if !self.accounts.is_logged_in() {
            self.checkout.abort_placement();
            return Err(AccountError::NotLoggedIn.into());
        }

        let order = self.checkout.complete_placement()?;
        self.accounts.record_order(order.clone())?;
        self.cart.clear();
        info!(
            order_id = %order.id,
            total = %order.total(),
            reference = %receipt.reference,
            "Order confirmed"
        );
        Ok(order)
    }
}

/// Returns the checkout to review if [`place_order`] is dropped mid-flight.
struct AbandonOnDrop<'a> {
    session: &'a Mutex<StorefrontSession>,
    order_id: OrderId,
    armed: bool,
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // A busy session reclaims the checkout on its next action instead.
        if let Ok(mut session) = self.session.try_lock() {
            session.abandon_placement(self.order_id);
        }
        warn!(order_id = %self.order_id, "Placement dropped before payment resolved");
    }
}

/// Place the session's order.
///
/// The lock is held only to enter and leave `Placing`; a second call made
/// while payment is in flight fails with `CheckoutError::AlreadyPlacing`.
/// Dropping the future before it resolves returns the checkout to review
/// without recording an order.
///
/// # Errors
///
/// Returns the first checkout, payment or account error encountered.
#[instrument(skip_all)]
pub async fn place_order(
    session: &Mutex<StorefrontSession>,
    payments: &dyn PaymentProcessor,
) -> Result<Order, CheckoutError> {
    let (request, ticket) = session.lock().await.begin_placement()?;
    let mut guard = AbandonOnDrop {
        session,
        order_id: ticket.order_id(),
        armed: true,
    };
    let payment = payments.capture(&request).await;

    let mut locked = session.lock().await;
    guard.armed = false;
    locked.finish_placement(ticket, payment)
}

//! The cart store: single owner of the session's cart.

use std::sync::Arc;

use tracing::{debug, info};

use delizio_core::{CartLineId, Money};

use super::coupon::{CouponError, redeem_coupon};
use super::line::{CartLineItem, ItemSnapshot, SelectedOptions};
use super::state::{CartAction, CartState};
use crate::catalog::{Catalog, Coupon};
use crate::persistence::{self, KeyValueStore, keys};

/// Notified with the new state after every cart mutation.
pub trait CartObserver: Send + Sync {
    fn on_change(&self, state: &CartState);
}

/// Writes the cart to local storage after every change.
///
/// Write failures are logged and otherwise ignored.
pub struct CartPersistence {
    storage: Arc<dyn KeyValueStore>,
}

impl CartPersistence {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }
}

impl CartObserver for CartPersistence {
    fn on_change(&self, state: &CartState) {
        persistence::save_json(self.storage.as_ref(), keys::CART, state);
    }
}

/// Owns the [`CartState`] and applies mutations to it.
#[derive(Default)]
pub struct CartStore {
    state: CartState,
    observers: Vec<Box<dyn CartObserver>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartStore {
    /// An empty cart with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the cart saved in `storage` and keep it saved from now on.
    ///
    /// Saved lines are replayed through `add`, so duplicates merge. The saved
    /// coupon is not restored. Missing or malformed data yields an empty cart.
    #[must_use]
    pub fn rehydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let saved: Option<CartState> = persistence::load_json(storage.as_ref(), keys::CART);

        let mut store = Self::new();
        store.subscribe(CartPersistence::new(storage));

        if let Some(saved) = saved {
            let lines = saved.items.len();
            for line in saved.items {
                store.dispatch(CartAction::Add(line));
            }
            info!(lines, "Restored saved cart");
        }
        store
    }

    /// Register an observer for future changes.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    #[must_use]
    pub const fn coupon(&self) -> Option<&Coupon> {
        self.state.coupon.as_ref()
    }

    /// Add `quantity` of `item`, merging into a line with the same item and
    /// options. Returns the ID of the line holding the item.
    ///
    /// A zero quantity changes nothing.
    pub fn add(
        &mut self,
        item: ItemSnapshot,
        quantity: u32,
        options: SelectedOptions,
    ) -> Option<CartLineId> {
        let item_id = item.item_id;
        debug!(%item_id, quantity, options = %options, "Adding to cart");

        let line = CartState::new_line(item, quantity, options.clone());
        self.dispatch(CartAction::Add(line));

        self.state
            .items
            .iter()
            .find(|l| l.same_line(item_id, &options))
            .map(|l| l.cart_id)
    }

    /// Remove a line. Unknown IDs are ignored.
    pub fn remove(&mut self, cart_id: CartLineId) {
        debug!(%cart_id, "Removing cart line");
        self.dispatch(CartAction::Remove(cart_id));
    }

    /// Replace a line's quantity; zero or less removes it. Unknown IDs are
    /// ignored.
    pub fn set_quantity(&mut self, cart_id: CartLineId, quantity: i64) {
        debug!(%cart_id, quantity, "Updating cart line quantity");
        self.dispatch(CartAction::SetQuantity { cart_id, quantity });
    }

    /// Remove every line. An applied coupon stays applied.
    pub fn clear(&mut self) {
        debug!("Clearing cart");
        self.dispatch(CartAction::Clear);
    }

    /// Apply `coupon`, replacing any previous one. Eligibility is not
    /// checked here; see [`Self::redeem`].
    pub fn apply_coupon(&mut self, coupon: Coupon) {
        debug!(code = %coupon.code, "Applying coupon");
        self.dispatch(CartAction::ApplyCoupon(coupon));
    }

    pub fn remove_coupon(&mut self) {
        debug!("Removing coupon");
        self.dispatch(CartAction::RemoveCoupon);
    }

    /// Validate `code` against the current subtotal and apply it.
    ///
    /// # Errors
    ///
    /// Returns `CouponError` if the code is unknown or the subtotal is below
    /// the coupon's minimum. The cart is unchanged on error.
    pub fn redeem(&mut self, catalog: &Catalog, code: &str) -> Result<Coupon, CouponError> {
        let coupon = redeem_coupon(catalog, code, self.subtotal())?.clone();
        info!(code = %coupon.code, subtotal = %self.subtotal(), "Coupon accepted");
        self.apply_coupon(coupon.clone());
        Ok(coupon)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Sum of line totals, before fees, tip and discount.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.state.subtotal()
    }

    fn dispatch(&mut self, action: CartAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
        for observer in &self.observers {
            observer.on_change(&self.state);
        }
    }
}

//! Pure cart state transitions.
//!
//! [`CartState::reduce`] is the only place cart contents change. It performs
//! no I/O; persistence is layered on top by [`super::CartStore`] observers.

use serde::{Deserialize, Serialize};

use delizio_core::{CartLineId, Money};

use super::line::{CartLineItem, ItemSnapshot, SelectedOptions};
use crate::catalog::Coupon;

/// Cart contents plus the applied coupon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Lines in insertion order, which is also display order.
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    /// At most one coupon at a time.
    #[serde(default)]
    pub coupon: Option<Coupon>,
}

/// A change to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add `line`, merging its quantity into an existing line with the same
    /// item and options.
    Add(CartLineItem),
    Remove(CartLineId),
    /// Replace a line's quantity. Zero or less removes the line.
    SetQuantity { cart_id: CartLineId, quantity: i64 },
    /// Remove every line. The applied coupon is kept.
    Clear,
    ApplyCoupon(Coupon),
    RemoveCoupon,
}

impl CartState {
    /// Apply `action` and return the resulting state.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add(line) => {
                if line.quantity == 0 {
                    return self;
                }
                if let Some(existing) = self
                    .items
                    .iter_mut()
                    .find(|l| l.same_line(line.item.item_id, &line.options))
                {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                } else {
                    self.items.push(line);
                }
            }
            CartAction::Remove(cart_id) => {
                self.items.retain(|l| l.cart_id != cart_id);
            }
            CartAction::SetQuantity { cart_id, quantity } => {
                if quantity <= 0 {
                    return self.reduce(CartAction::Remove(cart_id));
                }
                let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                if let Some(line) = self.items.iter_mut().find(|l| l.cart_id == cart_id) {
                    line.quantity = quantity;
                }
            }
            CartAction::Clear => self.items.clear(),
            CartAction::ApplyCoupon(coupon) => self.coupon = Some(coupon),
            CartAction::RemoveCoupon => self.coupon = None,
        }
        self
    }

    /// Build a fresh line for an add, with a newly generated line ID.
    #[must_use]
    pub fn new_line(item: ItemSnapshot, quantity: u32, options: SelectedOptions) -> CartLineItem {
        CartLineItem {
            cart_id: CartLineId::generate(),
            item,
            options,
            quantity,
        }
    }

    /// Look up a line by its ID.
    #[must_use]
    pub fn line(&self, cart_id: CartLineId) -> Option<&CartLineItem> {
        self.items.iter().find(|l| l.cart_id == cart_id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of unit price times quantity across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

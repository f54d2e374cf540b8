//! Cart state, mutations and coupon eligibility.
//!
//! - [`CartState`] / [`CartAction`] - pure state transitions
//! - [`CartStore`] - owns the state and notifies observers after each change
//! - [`redeem_coupon`] - coupon code validation

mod coupon;
mod line;
mod state;
mod store;

pub use coupon::{CouponError, redeem_coupon};
pub use line::{CartLineItem, ItemSnapshot, SelectedOptions};
pub use state::{CartAction, CartState};
pub use store::{CartObserver, CartPersistence, CartStore};

//! Collaborators the checkout flow talks to.
//!
//! # Services
//!
//! - `account` - Signed-in user, order history and loyalty points
//! - `payment` - Payment capture behind an injectable processor

pub mod account;
pub mod payment;

//! Domain records shared by checkout, accounts, tracking and the dashboard.

pub mod order;
pub mod user;

pub use order::{DeliveryInfo, Order};
pub use user::{Profile, ProfileUpdate, User};

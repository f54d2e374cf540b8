//! Account service.
//!
//! Holds the signed-in user for the session and persists it under
//! [`keys::USER`] after every change. There is no credential check: any
//! non-empty email and password sign in.

mod error;

pub use error::AccountError;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use delizio_core::{Money, OrderId, OrderStatus, UserId};

use crate::models::{Order, Profile, ProfileUpdate, User};
use crate::persistence::{self, KeyValueStore, MemoryStore, keys};
use crate::tracking::TrackingError;

/// Orders shown on the profile page.
const RECENT_ORDERS: usize = 3;

/// Profile page totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub total_orders: usize,
    pub total_spent: Money,
    pub loyalty_points: i64,
    /// Newest first.
    pub recent_orders: Vec<Order>,
}

/// The session's signed-in user.
pub struct AccountStore {
    storage: Arc<dyn KeyValueStore>,
    user: Option<User>,
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("user", &self.user.as_ref().map(|u| u.id))
            .finish_non_exhaustive()
    }
}

impl AccountStore {
    /// Restore the user saved in `storage`, if any.
    ///
    /// A malformed record is ignored and the session starts signed out.
    #[must_use]
    pub fn rehydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let user: Option<User> = persistence::load_json(storage.as_ref(), keys::USER);
        if let Some(user) = &user {
            info!(user_id = %user.id, orders = user.orders.len(), "Restored saved user");
        }
        Self { storage, user }
    }

    /// A signed-out store backed by memory only.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::rehydrate(Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in. The profile is derived from the email address.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::MissingCredentials` if either field is blank.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AccountError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AccountError::MissingCredentials);
        }

        let first_name = email.split('@').next().unwrap_or(email).to_string();
        let profile = Profile {
            email: email.to_string(),
            first_name,
            last_name: "User".to_string(),
            ..Profile::default()
        };
        let user = User::new(next_user_id(), profile, Utc::now());
        info!(user_id = %user.id, "User logged in");
        Ok(self.store(user))
    }

    /// Create an account from `profile` and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::MissingCredentials` if the email is blank.
    #[instrument(skip(self, profile), fields(email = %profile.email))]
    pub fn register(&mut self, mut profile: Profile) -> Result<&User, AccountError> {
        profile.email = profile.email.trim().to_string();
        if profile.email.is_empty() {
            return Err(AccountError::MissingCredentials);
        }
        let user = User::new(next_user_id(), profile, Utc::now());
        info!(user_id = %user.id, "User registered");
        Ok(self.store(user))
    }

    /// Sign out and forget the stored user.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "User logged out");
        }
        persistence::remove_key(self.storage.as_ref(), keys::USER);
    }

    /// Merge `update` into the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotLoggedIn` without a signed-in user.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&User, AccountError> {
        let mut user = self.user.take().ok_or(AccountError::NotLoggedIn)?;
        user.apply(update);
        Ok(self.store(user))
    }

    /// Append `order` to the history and award `floor(total)` loyalty points.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotLoggedIn` without a signed-in user.
    #[instrument(skip(self, order), fields(order_id = %order.id, total = %order.total()))]
    pub fn record_order(&mut self, order: Order) -> Result<&User, AccountError> {
        let mut user = self.user.take().ok_or(AccountError::NotLoggedIn)?;
        let points = order.total().floor_dollars().max(0);
        user.loyalty_points = user.loyalty_points.saturating_add(points);
        user.orders.push(order);
        info!(points, balance = user.loyalty_points, "Order recorded");
        Ok(self.store(user))
    }

    /// Order history, oldest first. Empty when signed out.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        self.user.as_ref().map_or(&[], |u| u.orders.as_slice())
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.user.as_ref()?.order(id)
    }

    /// The most recently placed order.
    #[must_use]
    pub fn latest_order(&self) -> Option<&Order> {
        self.orders().last()
    }

    /// Move an order to its next status and persist the change.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::OrderNotFound` for an unknown ID and
    /// `TrackingError::AlreadyFinal` once the order is delivered or completed.
    #[instrument(skip(self))]
    pub fn advance_order(&mut self, id: OrderId) -> Result<OrderStatus, TrackingError> {
        let user = self.user.as_mut().ok_or(TrackingError::OrderNotFound(id))?;
        let order = user
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(TrackingError::OrderNotFound(id))?;

        let next = order
            .status
            .next(order.order_type)
            .ok_or(TrackingError::AlreadyFinal {
                id,
                status: order.status,
            })?;
        order.status = next;
        info!(status = %next, "Order status advanced");

        if let Some(user) = &self.user {
            persistence::save_json(self.storage.as_ref(), keys::USER, user);
        }
        Ok(next)
    }

    /// Profile page totals, or `None` when signed out.
    #[must_use]
    pub fn summary(&self) -> Option<AccountSummary> {
        let user = self.user.as_ref()?;
        Some(AccountSummary {
            total_orders: user.orders.len(),
            total_spent: user.orders.iter().map(Order::total).sum(),
            loyalty_points: user.loyalty_points,
            recent_orders: user.orders.iter().rev().take(RECENT_ORDERS).cloned().collect(),
        })
    }

    fn store(&mut self, user: User) -> &User {
        persistence::save_json(self.storage.as_ref(), keys::USER, &user);
        self.user.insert(user)
    }
}

fn next_user_id() -> UserId {
    UserId::new(Utc::now().timestamp_millis())
}

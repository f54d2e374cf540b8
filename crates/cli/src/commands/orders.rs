//! Saved order commands.
//!
//! Reads the user record the storefront server keeps in `DELIZIO_DATA_DIR`.
//!
//! # Usage
//!
//! ```bash
//! delizio orders list
//! delizio orders advance 1718000000000
//! delizio stats
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use delizio_core::OrderId;
use delizio_storefront::admin::DashboardStats;
use delizio_storefront::config::StorefrontConfig;
use delizio_storefront::persistence::FileStore;
use delizio_storefront::services::account::AccountStore;
use delizio_storefront::tracking::{TrackingError, status_label};

/// Errors from the order commands.
#[derive(Debug, Error)]
pub enum OrdersError {
    /// Nobody is signed in on the storefront using this data directory.
    #[error("No saved user in {0}")]
    NoSavedUser(PathBuf),

    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

fn open(config: &StorefrontConfig) -> Result<AccountStore, OrdersError> {
    let accounts = AccountStore::rehydrate(Arc::new(FileStore::new(config.data_dir.clone())));
    if accounts.is_logged_in() {
        Ok(accounts)
    } else {
        Err(OrdersError::NoSavedUser(config.data_dir.clone()))
    }
}

/// Log the saved user's orders, newest first.
///
/// # Errors
///
/// Returns `OrdersError::NoSavedUser` if no user is stored.
pub fn list(config: &StorefrontConfig) -> Result<(), OrdersError> {
    let accounts = open(config)?;
    let orders = accounts.orders();
    if orders.is_empty() {
        tracing::info!("No orders yet");
    }
    for order in orders.iter().rev() {
        tracing::info!(
            "#{} {} {} {:>9} {} item(s), {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.order_type,
            order.total().to_string(),
            order.item_count(),
            status_label(order.status, order.order_type)
        );
    }
    if let Some(summary) = accounts.summary() {
        tracing::info!(
            "{} order(s), {} spent, {} loyalty points",
            summary.total_orders,
            summary.total_spent,
            summary.loyalty_points
        );
    }
    Ok(())
}

/// Move one saved order to its next status.
///
/// # Errors
///
/// Returns `OrdersError::Tracking` if the order is unknown or already final.
pub fn advance(config: &StorefrontConfig, id: i64) -> Result<(), OrdersError> {
    let mut accounts = open(config)?;
    let id = OrderId::new(id);
    let status = accounts.advance_order(id)?;
    tracing::info!("Order #{id} is now {status}");
    Ok(())
}

/// Log dashboard totals for the saved orders.
///
/// # Errors
///
/// Returns `OrdersError::NoSavedUser` if no user is stored.
pub fn stats(config: &StorefrontConfig) -> Result<(), OrdersError> {
    let accounts = open(config)?;
    let stats = DashboardStats::from_orders(accounts.orders());

    tracing::info!("Revenue:        {}", stats.total_revenue);
    tracing::info!("Orders:         {}", stats.total_orders);
    tracing::info!("Average order:  {}", stats.average_order);
    tracing::info!("Distinct items: {}", stats.distinct_items);
    for (status, count) in &stats.orders_by_status {
        tracing::info!("  {status}: {count}");
    }
    for item in &stats.top_items {
        tracing::info!("  {:>3} x {} ({})", item.units, item.name, item.revenue);
    }
    Ok(())
}

//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::persistence::{FileStore, KeyValueStore};
use crate::services::payment::{MockPaymentProcessor, PaymentProcessor};
use crate::session::StorefrontSession;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The storefront serves a
/// single customer session, so the session sits behind one async mutex.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Catalog,
    session: Mutex<StorefrontSession>,
    payments: Arc<dyn PaymentProcessor>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        catalog: Catalog,
        session: StorefrontSession,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                session: Mutex::new(session),
                payments,
            }),
        }
    }

    /// Build the state from configuration: built-in catalog, session
    /// restored from the data directory, mock payments.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::new(
            Catalog::builtin(),
            StorefrontSession::rehydrate(storage, config.pricing),
            Arc::new(MockPaymentProcessor::new(config.placement_delay)),
        )
    }

    /// Get a reference to the menu catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the customer session lock.
    #[must_use]
    pub fn session(&self) -> &Mutex<StorefrontSession> {
        &self.inner.session
    }

    /// Get the payment processor used at checkout.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentProcessor {
        self.inner.payments.as_ref()
    }
}

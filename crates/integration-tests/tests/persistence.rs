//! Cart and user records survive a restart.
//!
//! Uses a `FileStore` in a temporary directory, the same backend the
//! storefront binary uses.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use delizio_core::{MenuItemId, Money, OrderType, PaymentMethod};
use delizio_storefront::cart::SelectedOptions;
use delizio_storefront::catalog::Catalog;
use delizio_storefront::persistence::{FileStore, KeyValueStore, keys};
use delizio_storefront::pricing::{PricingConfig, Tip};
use delizio_storefront::services::payment::MockPaymentProcessor;
use delizio_storefront::session::{StorefrontSession, place_order};
use tokio::sync::Mutex;

fn open(dir: &std::path::Path) -> StorefrontSession {
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir));
    StorefrontSession::rehydrate(storage, PricingConfig::default())
}

fn add(session: &mut StorefrontSession, id: i64, quantity: u32, options: &[(&str, &str)]) {
    let catalog = Catalog::builtin();
    let mut selected = SelectedOptions::new();
    for (group, choice) in options {
        selected.select(*group, *choice);
    }
    let item = catalog.item(MenuItemId::new(id)).unwrap();
    session
        .cart_mut()
        .add(item.snapshot(&selected), quantity, selected);
}

// ============================================================================
// Cart
// ============================================================================

#[test]
fn test_cart_restored_without_coupon() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut session = open(dir.path());
        add(&mut session, 5, 2, &[("size", "Large")]);
        add(&mut session, 1, 1, &[]);
        session
            .cart_mut()
            .redeem(&Catalog::builtin(), "WELCOME10")
            .unwrap();
        assert!(session.cart().coupon().is_some());
    }

    let restored = open(dir.path());
    assert_eq!(restored.cart().item_count(), 3);
    assert_eq!(restored.cart().subtotal(), Money::from_cents(2799 * 2 + 1299));
    assert!(restored.cart().coupon().is_none());

    let large = restored
        .cart()
        .items()
        .iter()
        .find(|line| line.item.item_id == MenuItemId::new(5))
        .unwrap();
    assert_eq!(large.options.get("size"), Some("Large"));
    assert_eq!(large.item.unit_price, Money::from_cents(2799));
}

#[test]
fn test_restored_cart_keeps_saving() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut session = open(dir.path());
        add(&mut session, 3, 1, &[]);
    }
    {
        let mut session = open(dir.path());
        add(&mut session, 3, 1, &[]);
    }

    let restored = open(dir.path());
    assert_eq!(restored.cart().items().len(), 1);
    assert_eq!(restored.cart().item_count(), 2);
}

#[test]
fn test_malformed_cart_yields_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path())
        .set(keys::CART, "{ not json")
        .unwrap();

    let session = open(dir.path());
    assert!(session.cart().state().is_empty());
}

// ============================================================================
// User and Orders
// ============================================================================

#[tokio::test]
async fn test_orders_and_points_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let order_id = {
        let mut session = open(dir.path());
        session
            .accounts_mut()
            .login("nina@example.com", "pw")
            .unwrap();
        add(&mut session, 7, 1, &[]);
        session.select_order_type(OrderType::Pickup, None).unwrap();
        session.continue_to_payment().unwrap();
        session
            .choose_payment(PaymentMethod::Card, Tip::Percent(20))
            .unwrap();

        let session = Mutex::new(session);
        let order = place_order(&session, &MockPaymentProcessor::instant())
            .await
            .unwrap();
        order.id
    };

    let mut restored = open(dir.path());
    assert!(restored.cart().state().is_empty());
    let user = restored.accounts().current_user().unwrap();
    assert_eq!(user.profile.email, "nina@example.com");
    // 32.99 + 20% tip = 39.588
    assert_eq!(user.loyalty_points, 39);

    let order = restored.accounts().order(order_id).unwrap();
    assert_eq!(order.tip().rounded(), Money::from_cents(660));

    restored.accounts_mut().advance_order(order_id).unwrap();
    let again = open(dir.path());
    assert_eq!(
        again.accounts().order(order_id).unwrap().status.to_string(),
        "preparing"
    );
}

#[test]
fn test_logout_forgets_user() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut session = open(dir.path());
        session
            .accounts_mut()
            .login("nina@example.com", "pw")
            .unwrap();
        session.accounts_mut().logout();
    }

    let restored = open(dir.path());
    assert!(!restored.accounts().is_logged_in());
    assert!(
        FileStore::new(dir.path())
            .get(keys::USER)
            .unwrap()
            .is_none()
    );
}

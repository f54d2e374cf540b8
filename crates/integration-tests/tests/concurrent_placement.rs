//! Placement while payment is in flight.
//!
//! A second submit during `Placing` must be rejected so that one checkout
//! produces exactly one order.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use delizio_core::{MenuItemId, OrderType, PaymentMethod};
use delizio_integration_tests::TestServer;
use delizio_storefront::cart::SelectedOptions;
use delizio_storefront::catalog::Catalog;
use delizio_storefront::checkout::{CheckoutError, CheckoutStep};
use delizio_storefront::pricing::{PricingConfig, Tip};
use delizio_storefront::services::payment::MockPaymentProcessor;
use delizio_storefront::session::{StorefrontSession, place_order};
use reqwest::{Method, StatusCode};
use tokio::sync::Mutex;

fn ready_session() -> StorefrontSession {
    let catalog = Catalog::builtin();
    let mut session = StorefrontSession::ephemeral(PricingConfig::default());
    let item = catalog.item(MenuItemId::new(6)).unwrap();
    session
        .cart_mut()
        .add(item.snapshot(&SelectedOptions::new()), 1, SelectedOptions::new());
    session.accounts_mut().login("bea@example.com", "pw").unwrap();
    session.select_order_type(OrderType::Pickup, None).unwrap();
    session.continue_to_payment().unwrap();
    session
        .choose_payment(PaymentMethod::Paypal, Tip::None)
        .unwrap();
    session
}

// ============================================================================
// Session Level
// ============================================================================

#[tokio::test]
async fn test_double_submit_places_one_order() {
    let session = Mutex::new(ready_session());
    let payments = MockPaymentProcessor::new(Duration::from_millis(100));

    let (first, second) = tokio::join!(
        place_order(&session, &payments),
        place_order(&session, &payments)
    );

    let results = [first, second];
    let placed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(placed, 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(CheckoutError::AlreadyPlacing)))
    );

    let session = session.lock().await;
    assert_eq!(session.accounts().orders().len(), 1);
    assert_eq!(session.checkout().step(), CheckoutStep::Placed);
}

#[tokio::test]
async fn test_restart_ignored_while_placing() {
    let session = Mutex::new(ready_session());
    let payments = MockPaymentProcessor::new(Duration::from_millis(100));

    let meddle = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut guard = session.lock().await;
        guard.restart_checkout();
        guard.checkout().step()
    };

    let (placed, step_during) = tokio::join!(place_order(&session, &payments), meddle);
    assert_eq!(step_during, CheckoutStep::Placing);
    assert!(placed.is_ok());
}

#[tokio::test]
async fn test_cart_edits_during_placement_are_cleared() {
    let session = Mutex::new(ready_session());
    let payments = MockPaymentProcessor::new(Duration::from_millis(100));

    let add_more = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let catalog = Catalog::builtin();
        let item = catalog.item(MenuItemId::new(1)).unwrap();
        session.lock().await.cart_mut().add(
            item.snapshot(&SelectedOptions::new()),
            1,
            SelectedOptions::new(),
        );
    };

    let (placed, ()) = tokio::join!(place_order(&session, &payments), add_more);
    let order = placed.unwrap();

    // The order holds the cart as it was when placement began
    assert_eq!(order.item_count(), 1);
    assert_eq!(order.items.first().unwrap().item.item_id, MenuItemId::new(6));
    assert!(session.lock().await.cart().state().is_empty());
}

// ============================================================================
// HTTP Level
// ============================================================================

#[tokio::test]
async fn test_concurrent_place_requests() {
    let server = TestServer::start_with_payment_delay(Duration::from_millis(200)).await;
    let client = TestServer::client();
    server.ready_to_place(&client).await;

    let (first, second) = tokio::join!(
        server.send(&client, Method::POST, "/api/checkout/place", None),
        server.send(&client, Method::POST, "/api/checkout/place", None)
    );

    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let session = server.state().session().lock().await;
    assert_eq!(session.accounts().orders().len(), 1);
}

#[tokio::test]
async fn test_disconnected_client_still_gets_order() {
    let server = TestServer::start_with_payment_delay(Duration::from_millis(200)).await;
    let client = TestServer::client();
    server.ready_to_place(&client).await;

    let sent = client
        .post(server.url("/api/checkout/place"))
        .timeout(Duration::from_millis(50))
        .send()
        .await;
    assert!(sent.is_err());

    tokio::time::sleep(Duration::from_millis(400)).await;
    let session = server.state().session().lock().await;
    assert_eq!(session.accounts().orders().len(), 1);
    assert_eq!(session.checkout().step(), CheckoutStep::Placed);
}

#[tokio::test]
async fn test_prepared_session_places_over_http() {
    let server =
        TestServer::start_with(ready_session(), Arc::new(MockPaymentProcessor::instant())).await;
    let client = TestServer::client();

    let (status, placed) = server
        .send(&client, Method::POST, "/api/checkout/place", None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(placed["order"]["payment_method"], "paypal");

    let (_, checkout) = server
        .send(&client, Method::GET, "/api/checkout", None)
        .await;
    assert_eq!(checkout["step"], "placed");
    assert_eq!(checkout["placed_order"], placed["order"]["id"]);
}

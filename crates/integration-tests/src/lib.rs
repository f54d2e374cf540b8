//! Integration tests for Delizio.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p delizio-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port and talks to it
//! over HTTP, so no external services are needed.
//!
//! # Test Categories
//!
//! - `checkout_flow` - Browse, fill the cart, sign in and place an order
//! - `concurrent_placement` - Double submits produce a single order
//! - `persistence` - Cart and user survive a restart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use delizio_storefront::catalog::Catalog;
use delizio_storefront::pricing::PricingConfig;
use delizio_storefront::routes;
use delizio_storefront::services::payment::{MockPaymentProcessor, PaymentProcessor};
use delizio_storefront::session::StorefrontSession;
use delizio_storefront::state::AppState;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// A storefront running in the background for one test.
pub struct TestServer {
    addr: SocketAddr,
    state: AppState,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with an in-memory session and instant payments.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        Self::start_with(
            StorefrontSession::ephemeral(PricingConfig::default()),
            Arc::new(MockPaymentProcessor::instant()),
        )
        .await
    }

    /// Start a server whose payments take `delay` to approve.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start_with_payment_delay(delay: Duration) -> Self {
        Self::start_with(
            StorefrontSession::ephemeral(PricingConfig::default()),
            Arc::new(MockPaymentProcessor::new(delay)),
        )
        .await
    }

    /// Start a server around an existing session.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start_with(
        session: StorefrontSession,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        let state = AppState::new(Catalog::builtin(), session, payments);
        let app = routes::routes().with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The state shared with the running server.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// A plain HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Send a JSON request and return the status with the parsed body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn send(
        &self,
        client: &Client,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.expect("Request failed");
        let status = response.status();
        let body = if status == StatusCode::NO_CONTENT {
            Value::Null
        } else {
            response.json().await.expect("Response is not JSON")
        };
        (status, body)
    }

    /// Sign in, fill the cart with two carbonaras and walk checkout to the
    /// review step as a pickup order paid in cash.
    ///
    /// # Panics
    ///
    /// Panics if any step is rejected.
    pub async fn ready_to_place(&self, client: &Client) {
        let steps = [
            (
                "/api/account/login",
                json!({ "email": "ada@example.com", "password": "pw" }),
            ),
            ("/api/cart/items", json!({ "item_id": 5, "quantity": 2 })),
            ("/api/checkout/order-type", json!({ "order_type": "pickup" })),
            (
                "/api/checkout/payment",
                json!({ "payment_method": "cash" }),
            ),
        ];
        for (path, body) in steps {
            let (status, body) = self
                .send(client, reqwest::Method::POST, path, Some(body))
                .await;
            assert!(status.is_success(), "{path} failed with {status}: {body}");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

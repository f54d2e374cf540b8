//! HTTP route handlers for the storefront.
//!
//! Every endpoint speaks JSON. Errors use the `{"error": "..."}` body built
//! by [`crate::error::AppError`].
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Menu
//! GET    /api/menu                        - Menu items (?category=&search=&vegan=)
//! GET    /api/menu/popular                - Popular items
//! GET    /api/menu/categories             - Category list
//! GET    /api/menu/{id}                   - Single menu item
//! GET    /api/coupons                     - Available coupons
//!
//! # Cart
//! GET    /api/cart                        - Cart contents and subtotal
//! DELETE /api/cart                        - Empty the cart
//! POST   /api/cart/items                  - Add an item
//! PATCH  /api/cart/items/{cart_id}        - Set line quantity (0 removes)
//! DELETE /api/cart/items/{cart_id}        - Remove a line
//! POST   /api/cart/coupon                 - Apply a coupon code
//! DELETE /api/cart/coupon                 - Remove the coupon
//!
//! # Checkout
//! GET    /api/checkout                    - Checkout progress and price breakdown
//! POST   /api/checkout/order-type         - Choose delivery or pickup
//! POST   /api/checkout/payment            - Choose payment method and tip
//! POST   /api/checkout/back               - Go back one step
//! POST   /api/checkout/place              - Place the order
//! POST   /api/checkout/reset              - Start over
//!
//! # Account
//! GET    /api/account                     - Signed-in user and summary
//! PATCH  /api/account                     - Update profile fields
//! POST   /api/account/login               - Sign in
//! POST   /api/account/register            - Create an account
//! POST   /api/account/logout              - Sign out
//!
//! # Orders
//! GET    /api/orders                      - Order history
//! GET    /api/orders/latest               - Tracking for the newest order
//! GET    /api/orders/{id}/tracking        - Tracking for one order
//! POST   /api/orders/{id}/advance         - Move an order to its next status
//!
//! # Admin
//! GET    /api/admin/dashboard             - Aggregate order statistics
//! ```

pub mod account;
pub mod admin;
pub mod cart;
pub mod checkout;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/popular", get(menu::popular))
        .route("/categories", get(menu::categories))
        .route("/{id}", get(menu::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{cart_id}",
            patch(cart::update).delete(cart::remove),
        )
        .route(
            "/coupon",
            post(cart::apply_coupon).delete(cart::remove_coupon),
        )
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/order-type", post(checkout::order_type))
        .route("/payment", post(checkout::payment))
        .route("/back", post(checkout::back))
        .route("/place", post(checkout::place))
        .route("/reset", post(checkout::reset))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show).patch(account::update))
        .route("/login", post(account::login))
        .route("/register", post(account::register))
        .route("/logout", post(account::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/latest", get(orders::latest))
        .route("/{id}/tracking", get(orders::tracking))
        .route("/{id}/advance", post(orders::advance))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(admin::dashboard))
}

/// Create all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/menu", menu_routes())
        .route("/api/coupons", get(menu::coupons))
        .nest("/api/cart", cart_routes())
        .nest("/api/checkout", checkout_routes())
        .nest("/api/account", account_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/admin", admin_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

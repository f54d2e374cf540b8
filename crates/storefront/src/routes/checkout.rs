//! Checkout route handlers.
//!
//! The checkout flow is a small state machine kept in the session; each
//! handler performs one transition and returns the resulting progress.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use delizio_core::{OrderType, PaymentMethod};

use crate::checkout::CheckoutSession;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{DeliveryInfo, Order};
use crate::pricing::{PriceBreakdown, Tip};
use crate::session::{StorefrontSession, place_order};
use crate::state::AppState;
use crate::tracking::OrderTracking;

/// Checkout progress as sent to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    #[serde(flatten)]
    pub checkout: CheckoutSession,
    /// 1-based step number for progress indicators.
    pub step_number: u8,
    /// Present once an order type is chosen.
    pub breakdown: Option<PriceBreakdown>,
    pub logged_in: bool,
    pub tip_percentages: [u8; 3],
    /// Flat quick-pick tips, in whole dollars.
    pub tip_amounts: [i64; 4],
}

impl CheckoutView {
    fn of(session: &StorefrontSession) -> Self {
        Self {
            checkout: session.checkout().clone(),
            step_number: session.checkout().step().number(),
            breakdown: session.breakdown(),
            logged_in: session.accounts().is_logged_in(),
            tip_percentages: Tip::PRESET_PERCENTAGES,
            tip_amounts: Tip::QUICK_AMOUNTS,
        }
    }
}

/// Order type request body.
#[derive(Debug, Deserialize)]
pub struct OrderTypeRequest {
    pub order_type: OrderType,
    /// Delivery details; required for delivery unless the profile fills them.
    #[serde(default)]
    pub delivery: Option<DeliveryInfo>,
}

/// Payment request body.
#[derive(Debug, Deserialize)]
pub struct PaymentChoiceRequest {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub tip: Tip,
}

/// A freshly placed order.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    pub order: Order,
    pub tracking: OrderTracking,
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CheckoutView> {
    let session = state.session().lock().await;
    Json(CheckoutView::of(&session))
}

/// Choose delivery or pickup and continue to payment.
#[instrument(skip(state))]
pub async fn order_type(
    State(state): State<AppState>,
    Json(request): Json<OrderTypeRequest>,
) -> Result<Json<CheckoutView>> {
    let mut session = state.session().lock().await;
    session.select_order_type(request.order_type, request.delivery)?;
    session.continue_to_payment()?;
    Ok(Json(CheckoutView::of(&session)))
}

/// Choose the payment method and tip and continue to review.
#[instrument(skip(state))]
pub async fn payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentChoiceRequest>,
) -> Result<Json<CheckoutView>> {
    let mut session = state.session().lock().await;
    session.choose_payment(request.payment_method, request.tip)?;
    Ok(Json(CheckoutView::of(&session)))
}

#[instrument(skip(state))]
pub async fn back(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let mut session = state.session().lock().await;
    session.back()?;
    Ok(Json(CheckoutView::of(&session)))
}

/// Place the order. Responds once payment has been captured.
///
/// Placement runs on its own task so a client that disconnects mid-payment
/// still gets its order recorded.
#[instrument(skip(state))]
pub async fn place(State(state): State<AppState>) -> Result<(StatusCode, Json<PlacedOrder>)> {
    add_breadcrumb("checkout", "Placing order", &[]);
    let placing = state.clone();
    let order = tokio::spawn(async move {
        place_order(placing.session(), placing.payments()).await
    })
    .await
    .map_err(|e| AppError::Internal(format!("placement task failed: {e}")))??;
    info!(order_id = %order.id, "Order placed");

    let tracking = OrderTracking::for_order(&order);
    Ok((StatusCode::CREATED, Json(PlacedOrder { order, tracking })))
}

#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Json<CheckoutView> {
    let mut session = state.session().lock().await;
    session.restart_checkout();
    Json(CheckoutView::of(&session))
}

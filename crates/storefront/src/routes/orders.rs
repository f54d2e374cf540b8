//! Order history and tracking route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use delizio_core::OrderId;

use crate::error::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;
use crate::tracking::{OrderTracking, TrackingError};

/// The signed-in user's orders, oldest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Order>> {
    let session = state.session().lock().await;
    Json(session.accounts().orders().to_vec())
}

/// Tracking for the most recent order.
#[instrument(skip(state))]
pub async fn latest(State(state): State<AppState>) -> Result<Json<OrderTracking>> {
    let session = state.session().lock().await;
    session
        .accounts()
        .latest_order()
        .map(|order| Json(OrderTracking::for_order(order)))
        .ok_or_else(|| AppError::NotFound("no orders yet".to_string()))
}

#[instrument(skip(state))]
pub async fn tracking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderTracking>> {
    let id = OrderId::new(id);
    let session = state.session().lock().await;
    let order = session
        .accounts()
        .order(id)
        .ok_or(TrackingError::OrderNotFound(id))?;
    Ok(Json(OrderTracking::for_order(order)))
}

/// Move an order to its next status.
///
/// Status changes are driven by staff in a real kitchen; this endpoint lets
/// the demo walk an order through its lifecycle.
#[instrument(skip(state))]
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderTracking>> {
    let id = OrderId::new(id);
    let mut session = state.session().lock().await;
    session.accounts_mut().advance_order(id)?;
    let order = session
        .accounts()
        .order(id)
        .ok_or(TrackingError::OrderNotFound(id))?;
    Ok(Json(OrderTracking::for_order(order)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::routes::test_support::{body_json, empty_request, test_app};

    #[tokio::test]
    async fn test_unknown_order_tracking() {
        let response = test_app()
            .oneshot(empty_request("GET", "/api/orders/42/tracking"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "order 42 not found");
    }

    #[tokio::test]
    async fn test_no_latest_order() {
        let response = test_app()
            .oneshot(empty_request("GET", "/api/orders/latest"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_empty_when_signed_out() {
        let response = test_app()
            .oneshot(empty_request("GET", "/api/orders"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }
}

//! Cart route handlers.
//!
//! Each mutation returns the whole cart so the client can re-render from a
//! single response.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delizio_core::{CartLineId, IdParseError, MenuItemId, Money};

use crate::cart::{CartLineItem, CartStore, SelectedOptions};
use crate::catalog::Coupon;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::pricing::discount_amount;
use crate::state::AppState;

/// Cart contents as sent to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub coupon: Option<Coupon>,
    pub item_count: u64,
    pub subtotal: Money,
    /// Discount the applied coupon gives on the current subtotal.
    pub discount: Money,
}

impl CartView {
    fn of(cart: &CartStore) -> Self {
        let subtotal = cart.subtotal();
        Self {
            items: cart.items().to_vec(),
            coupon: cart.coupon().cloned(),
            item_count: cart.item_count(),
            subtotal,
            discount: discount_amount(subtotal, cart.coupon()),
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub item_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub options: SelectedOptions,
}

const fn default_quantity() -> u32 {
    1
}

/// Line quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Coupon request body.
#[derive(Debug, Deserialize)]
pub struct CouponRequest {
    pub code: String,
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let session = state.session().lock().await;
    Json(CartView::of(session.cart()))
}

#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut session = state.session().lock().await;
    session.cart_mut().clear();
    Json(CartView::of(session.cart()))
}

/// Add a menu item, priced from the catalog with the chosen options.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    if request.quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let item = state
        .catalog()
        .item(MenuItemId::new(request.item_id))
        .ok_or_else(|| AppError::NotFound(format!("menu item {}", request.item_id)))?;
    for (group, choice) in request.options.iter() {
        let known = item
            .option_group(group)
            .is_some_and(|g| g.choice(choice).is_some());
        if !known {
            return Err(AppError::BadRequest(format!(
                "{} has no option {group}: {choice}",
                item.name
            )));
        }
    }

    let snapshot = item.snapshot(&request.options);
    add_breadcrumb(
        "cart",
        "Added item to cart",
        &[
            ("item_id", request.item_id.to_string()),
            ("quantity", request.quantity.to_string()),
        ],
    );

    let mut session = state.session().lock().await;
    session
        .cart_mut()
        .add(snapshot, request.quantity, request.options);
    Ok((StatusCode::CREATED, Json(CartView::of(session.cart()))))
}

/// Set a line's quantity. Zero or less removes the line; unknown lines are
/// left alone.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let cart_id = parse_line_id(&cart_id)?;
    let mut session = state.session().lock().await;
    session.cart_mut().set_quantity(cart_id, request.quantity);
    Ok(Json(CartView::of(session.cart())))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Result<Json<CartView>> {
    let cart_id = parse_line_id(&cart_id)?;
    let mut session = state.session().lock().await;
    session.cart_mut().remove(cart_id);
    Ok(Json(CartView::of(session.cart())))
}

/// Validate and apply a coupon code.
#[instrument(skip(state))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(request): Json<CouponRequest>,
) -> Result<Json<CartView>> {
    let mut session = state.session().lock().await;
    let coupon = session.cart_mut().redeem(state.catalog(), &request.code)?;
    add_breadcrumb("cart", "Applied coupon", &[("code", coupon.code)]);
    Ok(Json(CartView::of(session.cart())))
}

#[instrument(skip(state))]
pub async fn remove_coupon(State(state): State<AppState>) -> Json<CartView> {
    let mut session = state.session().lock().await;
    session.cart_mut().remove_coupon();
    Json(CartView::of(session.cart()))
}

fn parse_line_id(raw: &str) -> Result<CartLineId> {
    raw.parse()
        .map_err(|e: IdParseError| AppError::BadRequest(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::routes::test_support::{body_json, empty_request, json_request, test_app};

    #[tokio::test]
    async fn test_add_update_and_remove_line() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/cart/items",
                &json!({ "item_id": 5, "quantity": 2, "options": { "size": "Large" } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let cart = body_json(response).await;
        assert_eq!(cart["item_count"], 2);
        assert_eq!(cart["subtotal"], "55.98");
        let cart_id = cart["items"][0]["cart_id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/api/cart/items/{cart_id}"),
                &json!({ "quantity": 3 }),
            ))
            .await
            .unwrap();
        let cart = body_json(response).await;
        assert_eq!(cart["item_count"], 3);

        let response = app
            .clone()
            .oneshot(empty_request(
                "DELETE",
                &format!("/api/cart/items/{cart_id}"),
            ))
            .await
            .unwrap();
        let cart = body_json(response).await;
        assert_eq!(cart["items"], json!([]));
        assert_eq!(cart["item_count"], 0);
    }

    #[tokio::test]
    async fn test_add_unknown_item() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                "/api/cart/items",
                &json!({ "item_id": 999 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_option() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                "/api/cart/items",
                &json!({ "item_id": 5, "options": { "size": "Huge" } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_coupon_minimum_not_met() {
        let app = test_app();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/cart/items",
                &json!({ "item_id": 4 }),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/cart/coupon",
                &json!({ "code": "WELCOME10" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Minimum order of $25.00 required");
    }

    #[tokio::test]
    async fn test_unknown_line_is_ignored() {
        let response = test_app()
            .oneshot(json_request(
                "PATCH",
                "/api/cart/items/7b0f6c1e-9a55-4c39-9a3c-4ad1d2f0b3e1",
                &json!({ "quantity": 4 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

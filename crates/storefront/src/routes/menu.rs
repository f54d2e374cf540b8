//! Menu and coupon route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use delizio_core::MenuItemId;

use crate::catalog::{Coupon, MenuCategory, MenuItem, MenuQuery};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for menu browsing.
#[derive(Debug, Default, Deserialize)]
pub struct MenuParams {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub vegan: bool,
}

impl From<MenuParams> for MenuQuery {
    fn from(params: MenuParams) -> Self {
        Self {
            category: params.category,
            search: params.search,
            vegan_only: params.vegan,
        }
    }
}

/// List menu items matching the filters, in catalog order.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> Json<Vec<MenuItem>> {
    let query = MenuQuery::from(params);
    Json(state.catalog().search(&query).into_iter().cloned().collect())
}

#[instrument(skip(state))]
pub async fn popular(State(state): State<AppState>) -> Json<Vec<MenuItem>> {
    Json(state.catalog().popular().into_iter().cloned().collect())
}

#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<MenuCategory>> {
    Json(state.catalog().categories().to_vec())
}

/// Show a single menu item.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<MenuItem>> {
    state
        .catalog()
        .item(MenuItemId::new(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))
}

#[instrument(skip(state))]
pub async fn coupons(State(state): State<AppState>) -> Json<Vec<Coupon>> {
    Json(state.catalog().coupons().to_vec())
}

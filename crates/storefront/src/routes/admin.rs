//! Admin dashboard route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::admin::DashboardStats;
use crate::state::AppState;

/// Revenue, order counts and best sellers over the stored orders.
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    let session = state.session().lock().await;
    Json(DashboardStats::from_orders(session.accounts().orders()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::routes::test_support::{body_json, empty_request, test_app};

    #[tokio::test]
    async fn test_dashboard_without_orders() {
        let response = test_app()
            .oneshot(empty_request("GET", "/api/admin/dashboard"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stats = body_json(response).await;
        assert_eq!(stats["total_orders"], 0);
        assert_eq!(stats["recent_orders"], serde_json::json!([]));
    }
}

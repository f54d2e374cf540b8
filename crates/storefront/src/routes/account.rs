//! Account route handlers.
//!
//! Authentication is simulated: any non-empty email and password sign in.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::models::{Profile, ProfileUpdate, User};
use crate::services::account::AccountSummary;
use crate::state::AppState;

/// The signed-in user, if any, with their order summary.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub user: Option<User>,
    pub summary: Option<AccountSummary>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<AccountView> {
    let session = state.session().lock().await;
    let accounts = session.accounts();
    Json(AccountView {
        user: accounts.current_user().cloned(),
        summary: accounts.summary(),
    })
}

/// Sign in with email and password.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let mut session = state.session().lock().await;
    let user = session
        .accounts_mut()
        .login(&request.email, &request.password)?;
    set_sentry_user(&user.id, Some(&user.profile.email));
    Ok(Json(user.clone()))
}

/// Create an account from profile fields and sign in.
#[instrument(skip(state, profile), fields(email = %profile.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<(StatusCode, Json<User>)> {
    let mut session = state.session().lock().await;
    let user = session.accounts_mut().register(profile)?;
    set_sentry_user(&user.id, Some(&user.profile.email));
    Ok((StatusCode::CREATED, Json(user.clone())))
}

/// Update the signed-in user's profile. Omitted fields keep their values.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    let mut session = state.session().lock().await;
    let user = session.accounts_mut().update_profile(update)?;
    Ok(Json(user.clone()))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session().lock().await.accounts_mut().logout();
    clear_sentry_user();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::routes::test_support::{body_json, empty_request, json_request, test_app};

    #[tokio::test]
    async fn test_login_and_logout() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/account/login",
                &json!({ "email": "giulia@example.com", "password": "secret" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let user = body_json(response).await;
        assert_eq!(user["first_name"], "giulia");
        assert_eq!(user["loyalty_points"], 0);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/account"))
            .await
            .unwrap();
        let account = body_json(response).await;
        assert_eq!(account["summary"]["total_orders"], 0);

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/account/logout"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", "/api/account"))
            .await
            .unwrap();
        let account = body_json(response).await;
        assert!(account["user"].is_null());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                "/api/account/login",
                &json!({ "email": "giulia@example.com", "password": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Please fill in all fields");
    }

    #[tokio::test]
    async fn test_update_requires_login() {
        let response = test_app()
            .oneshot(json_request(
                "PATCH",
                "/api/account",
                &json!({ "phone": "555-0100" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

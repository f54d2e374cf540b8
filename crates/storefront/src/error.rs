//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cart::CouponError;
use crate::checkout::CheckoutError;
use crate::pricing::TipError;
use crate::services::account::AccountError;
use crate::tracking::TrackingError;

/// Where clients are sent when an action needs a signed-in user.
pub const LOGIN_PATH: &str = "/login";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Coupon code rejected.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Checkout transition rejected or placement failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Tip amount rejected.
    #[error(transparent)]
    Tip(#[from] TipError),

    /// Account operation failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Order tracking operation failed.
    #[error(transparent)]
    Tracking(#[from] TrackingError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Coupon(_) | Self::Tip(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Checkout(err) => match err {
                CheckoutError::LoginRequired | CheckoutError::Account(AccountError::NotLoggedIn) => {
                    StatusCode::UNAUTHORIZED
                }
                CheckoutError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
                CheckoutError::AlreadyPlacing | CheckoutError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
                CheckoutError::EmptyCart
                | CheckoutError::OrderTypeRequired
                | CheckoutError::MissingDeliveryInfo(_)
                | CheckoutError::Tip(_)
                | CheckoutError::Account(AccountError::MissingCredentials) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            Self::Account(AccountError::MissingCredentials) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Account(AccountError::NotLoggedIn) => StatusCode::UNAUTHORIZED,
            Self::Tracking(TrackingError::OrderNotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Tracking(TrackingError::AlreadyFinal { .. }) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = if status == StatusCode::UNAUTHORIZED {
            json!({ "error": message, "redirect": LOGIN_PATH })
        } else {
            json!({ "error": message })
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for cart and checkout actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delizio_core::{Money, OrderId, OrderStatus};

    use super::*;
    use crate::services::payment::PaymentError;

    fn get_status(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("menu item 99".to_string());
        assert_eq!(err.to_string(), "Not found: menu item 99");

        let err = AppError::from(CouponError::MinimumNotMet {
            minimum: Money::from_dollars(25),
        });
        assert_eq!(err.to_string(), "Minimum order of $25.00 required");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(CouponError::InvalidCode), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(get_status(CheckoutError::LoginRequired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(CheckoutError::Payment(PaymentError::Declined("no".to_string()))),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(get_status(CheckoutError::AlreadyPlacing), StatusCode::CONFLICT);
        assert_eq!(
            get_status(TrackingError::OrderNotFound(OrderId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(TrackingError::AlreadyFinal {
                id: OrderId::new(1),
                status: OrderStatus::Completed
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

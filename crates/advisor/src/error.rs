//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers that can fail return
//! `Result<T, AppError>`. Proxy failures never reach this type: they are
//! rendered as chat bubbles by the advisor routes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use routine_advisor_core::ProductId;

/// Application-level error type for the advisor.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Product id is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let (status, message) = match &self {
            Self::Session(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            Self::UnknownProduct(_) => (StatusCode::NOT_FOUND, self.to_string()),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("selection", "Toggled product", Some(&[("product_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::UnknownProduct(ProductId::new(123));
        assert_eq!(err.to_string(), "Unknown product: 123");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::UnknownProduct(ProductId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Session(tower_sessions::session::Error::Store(
                tower_sessions::session_store::Error::Backend("disk full".to_string())
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

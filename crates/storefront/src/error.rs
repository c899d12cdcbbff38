//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Responses carry a JSON body of the form
//! `{ "success": false, "message": ..., "errors": ... }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{ContactError, ContactErrors};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submitted form failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ContactErrors),

    /// Forwarding to the form endpoint failed.
    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ContactErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Contact(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Contact(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(errors) => ErrorBody {
                success: false,
                message: "Please check the highlighted fields.".to_string(),
                errors: Some(errors),
            },
            Self::Contact(_) => ErrorBody {
                success: false,
                message: "Failed to submit form".to_string(),
                errors: None,
            },
            err @ Self::NotFound(_) => ErrorBody {
                success: false,
                message: err.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("catalog", "Filtered catalog", Some(&[("category", "Mietmöbel")]));
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

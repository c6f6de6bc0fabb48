//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use hook_keeper_core::DispatchError;
use tracing::{error, warn};

/// Webhook endpoint errors with HTTP status code mapping
///
/// - `400 Bad Request`: missing/empty `X-Event-Key`, or a body that does not
///   decode into the schema of the key
/// - `404 Not Found`: no handler is registered for the key
/// - `500 Internal Server Error`: the handler reported failure
///
/// # Security Considerations
///
/// Handler error details are logged server-side only; the response body
/// carries a generic message for that class.
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    /// Dispatch did not complete successfully
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl WebhookHandlerError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Dispatch(e) => StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (category, message) = match &self {
            Self::Dispatch(e @ DispatchError::HandlerFailed { .. }) => {
                // Log detailed error server-side but return generic message to client
                error!(error = %e, "Webhook handler failed");
                (
                    e.category(),
                    "Event handler failed to process the webhook".to_string(),
                )
            }
            Self::Dispatch(e) => {
                warn!(error = %e, status = %status, "Rejected webhook request");
                (e.category(), e.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
            "category": category,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration loading failed: {message}")]
    Load { message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

//! # Dispatcher
//!
//! Turns one inbound webhook request into at most one handler invocation.
//!
//! Per request:
//! 1. Read `X-Event-Key`; absent or blank → [`DispatchError::MissingEventKey`]
//! 2. Look the key up in the [`EventRegistry`]; miss → [`DispatchError::UnknownEvent`]
//! 3. Decode the body with the schema of the key; failure → [`DispatchError::MalformedPayload`]
//! 4. Invoke the handler once; error → [`DispatchError::HandlerFailed`]
//!
//! Steps 1-3 never reach handler code. The dispatcher does not retry, does
//! not de-duplicate, and never changes the registry.

use crate::{
    event_kind::EventKind, events::BitbucketEvent, handler::HandlerError, headers::Headers,
    registry::EventRegistry,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Result of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Event kind the handler was invoked for
    pub kind: EventKind,

    /// Delivery ID from `X-Request-UUID`, when the sender supplied one
    pub request_uuid: Option<Uuid>,
}

/// Reasons a request was not handled successfully.
///
/// The four variants stay distinguishable to the caller through
/// [`status_code`](Self::status_code) and [`category`](Self::category).
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No `X-Event-Key` header, or an empty one
    #[error("Missing or empty X-Event-Key header")]
    MissingEventKey,

    /// The key is well-formed but no handler is bound to it
    #[error("No handler registered for event key '{key}'")]
    UnknownEvent { key: String },

    /// The body does not decode into the schema of the key
    #[error("Malformed payload for event key '{key}': {source}")]
    MalformedPayload {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The handler ran and reported failure
    #[error("Handler for event key '{key}' failed: {source}")]
    HandlerFailed {
        key: String,
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// HTTP status code for this outcome.
    ///
    /// - `400` for a missing key or a malformed payload
    /// - `404` for an unrecognized key
    /// - `500` for a handler failure
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingEventKey => 400,
            Self::UnknownEvent { .. } => 404,
            Self::MalformedPayload { .. } => 400,
            Self::HandlerFailed { .. } => 500,
        }
    }

    /// Stable machine-readable label for this outcome.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingEventKey => "unidentified_request",
            Self::UnknownEvent { .. } => "unrecognized_event",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::HandlerFailed { .. } => "handler_failure",
        }
    }

    /// Whether a handler was invoked before this error was produced.
    pub fn handler_invoked(&self) -> bool {
        matches!(self, Self::HandlerFailed { .. })
    }
}

/// Routes webhook requests to the handlers in an [`EventRegistry`].
///
/// Cheap to clone; clones share the registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<EventRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over `registry`.
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher consults.
    pub fn registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    /// Dispatch one request.
    ///
    /// # Arguments
    ///
    /// * `headers` - Every header of the inbound request; passed to the handler unchanged
    /// * `body` - Raw request body
    ///
    /// # Errors
    ///
    /// See [`DispatchError`] for the four failure classes.
    pub async fn dispatch(
        &self,
        headers: &Headers,
        body: &[u8],
    ) -> Result<DispatchOutcome, DispatchError> {
        let request_uuid = headers.request_uuid();

        let key = match headers.event_key() {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                warn!(request_uuid = ?request_uuid, "Rejecting webhook without event key");
                return Err(DispatchError::MissingEventKey);
            }
        };

        let Some(registration) = self.registry.lookup(key).await else {
            warn!(
                event_key = %key,
                request_uuid = ?request_uuid,
                "No handler registered for event key"
            );
            return Err(DispatchError::UnknownEvent {
                key: key.to_string(),
            });
        };

        let event = BitbucketEvent::decode(registration.kind, body).map_err(|e| {
            warn!(
                event_key = %key,
                request_uuid = ?request_uuid,
                error = %e,
                "Failed to decode webhook payload"
            );
            DispatchError::MalformedPayload {
                key: key.to_string(),
                source: e,
            }
        })?;

        debug!(
            event_key = %key,
            request_uuid = ?request_uuid,
            repository = %event.repository().full_name,
            "Invoking event handler"
        );

        if let Err(e) = registration.handler.handle_event(headers, &event).await {
            error!(
                event_key = %key,
                request_uuid = ?request_uuid,
                error = %e,
                "Event handler failed"
            );
            return Err(DispatchError::HandlerFailed {
                key: key.to_string(),
                source: e,
            });
        }

        info!(
            event_key = %key,
            request_uuid = ?request_uuid,
            "Webhook dispatched"
        );

        Ok(DispatchOutcome {
            kind: registration.kind,
            request_uuid,
        })
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

//! # Hook-Keeper HTTP Service
//!
//! HTTP surface for receiving Bitbucket webhooks and dispatching them through
//! the Hook-Keeper core.
//!
//! This crate provides:
//! - The webhook endpoint (`POST {webhooks.endpoint_path}`, `/` by default)
//! - A health endpoint (`GET /health`)
//! - Dispatch outcome → HTTP status mapping
//! - Server start-up with graceful shutdown

pub mod config;
pub mod errors;
pub mod responses;

pub use config::{LoggingConfig, SecurityConfig, ServerConfig, ServiceConfig, WebhookConfig};
pub use errors::{ConfigError, ServiceError, WebhookHandlerError};
pub use responses::{HealthResponse, WebhookResponse};

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use hook_keeper_core::{
    headers::REQUEST_UUID_HEADER, Dispatcher, EventRegistry, Headers, EVENT_KEY_HEADER,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: Arc<ServiceConfig>,

    /// Dispatcher routing webhooks to registered handlers
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ServiceConfig, registry: Arc<EventRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(registry),
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_body_size;

    Router::new()
        .route(&state.config.webhooks.endpoint_path, post(handle_webhook))
        .route("/health", get(handle_health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    request_logging_middleware,
                ))
                .layer(DefaultBodyLimit::max(max_body_size))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
///
/// Serves until SIGINT or SIGTERM, then lets in-flight requests finish for
/// up to `server.shutdown_timeout_seconds`.
pub async fn start_server(
    config: ServiceConfig,
    registry: Arc<EventRegistry>,
) -> Result<(), ServiceError> {
    config.validate()?;

    let address = config.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let state = AppState::new(config, registry);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;

    info!("Starting HTTP server on {}", address);

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let serve = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = shutdown_tx.send(true);
            })
            .await
    };
    tokio::pin!(serve);

    // The server stops accepting connections as soon as the signal fires;
    // in-flight requests get the configured grace period.
    tokio::select! {
        result = &mut serve => {
            return result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            });
        }
        _ = shutdown_rx.changed() => {}
    }

    match tokio::time::timeout(shutdown_timeout, &mut serve).await {
        Ok(result) => result.map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?,
        Err(_) => warn!(
            timeout_seconds = shutdown_timeout.as_secs(),
            "Graceful shutdown timed out; abandoning in-flight requests"
        ),
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

// ============================================================================
// Webhook Handlers
// ============================================================================

/// Handle Bitbucket webhook requests
///
/// 1. Convert the transport headers into [`Headers`], keeping every header
/// 2. Dispatch through the registry (key check, lookup, decode, handler call)
/// 3. Map the outcome to a status code
///
/// The response is sent only after the handler returns.
#[instrument(skip(state, headers, body), fields(event_key))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookHandlerError> {
    let headers = headers_from_http(&headers);
    if let Some(key) = headers.event_key() {
        tracing::Span::current().record("event_key", key);
    }

    debug!(body_size = body.len(), "Received webhook request");

    let outcome = state.dispatcher.dispatch(&headers, &body).await?;

    Ok(Json(WebhookResponse {
        status: "processed".to_string(),
        event_key: outcome.kind.to_string(),
        request_uuid: outcome.request_uuid,
    }))
}

/// Convert transport headers into the handler-facing [`Headers`] view.
///
/// Values are decoded as UTF-8; invalid sequences become U+FFFD.
pub fn headers_from_http(headers: &HeaderMap) -> Headers {
    headers
        .iter()
        .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes())))
        .collect()
}

// ============================================================================
// Health Check Handlers
// ============================================================================

/// Basic health check endpoint
#[instrument(skip(state))]
async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        registered_events: state.dispatcher.registry().keys().await,
        timestamp: chrono::Utc::now(),
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware
///
/// Uses `X-Request-UUID` as the correlation ID when present and generates
/// one otherwise. With `security.log_requests` enabled every header is
/// logged at debug level.
async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let correlation_id = request
        .headers()
        .get(REQUEST_UUID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let event_key = request
        .headers()
        .get(EVENT_KEY_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        event_key = %event_key,
        "Request started"
    );

    if state.config.security.log_requests {
        for (name, value) in request.headers() {
            debug!(
                correlation_id = %correlation_id,
                header = %name,
                value = %String::from_utf8_lossy(value.as_bytes()),
                "Request header"
            );
        }
    }

    let response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();

    // Log at appropriate level based on status code
    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

//! Common test utilities for hook-keeper integration tests
//!
//! This module provides:
//! - A recording [`EventHandler`] double
//! - Fixture loading
//! - Router and request builders

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
    Router,
};
use hook_keeper_api::{create_router, AppState, ServiceConfig};
use hook_keeper_core::{
    BitbucketEvent, EventHandler, EventKind, EventRegistry, HandlerError, Headers,
};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// Handler double that records every invocation.
#[derive(Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<(Headers, BitbucketEvent)>>,
    failure: Option<String>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A handler that records the call and then fails with `message`.
    #[allow(dead_code)]
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(message.to_string()),
            ..Self::default()
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<(Headers, BitbucketEvent)> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn last_event(&self) -> Option<BitbucketEvent> {
        self.calls.lock().unwrap().last().map(|(_, e)| e.clone())
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle_event(
        &self,
        headers: &Headers,
        event: &BitbucketEvent,
    ) -> Result<(), HandlerError> {
        self.calls
            .lock()
            .unwrap()
            .push((headers.clone(), event.clone()));

        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Fixture file name for an event key (`repo:push` → `repo_push.json`).
pub fn fixture_name(kind: EventKind) -> String {
    format!("{}.json", kind.as_str().replace(':', "_"))
}

/// Raw bytes of the fixture for `kind`.
pub fn load_fixture(kind: EventKind) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture_name(kind));
    std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

// ============================================================================
// App and Request Builders
// ============================================================================

/// Router with `handler` bound to every kind in `kinds`.
pub async fn create_test_app(kinds: &[EventKind], handler: Arc<RecordingHandler>) -> Router {
    create_test_app_with_config(ServiceConfig::default(), kinds, handler).await
}

pub async fn create_test_app_with_config(
    config: ServiceConfig,
    kinds: &[EventKind],
    handler: Arc<RecordingHandler>,
) -> Router {
    let registry = Arc::new(EventRegistry::new());
    registry.register_all(kinds.iter().copied(), handler).await;
    create_router(AppState::new(config, registry))
}

/// POST to `/` with the given event key and body.
pub fn webhook_request(event_key: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("user-agent", "Bitbucket-Webhooks/2.0")
        .header("x-request-uuid", "1f2e3d4c-5b6a-4978-8a9b-0c1d2e3f4a5b")
        .header("x-hook-uuid", "9a8b7c6d-5e4f-4a3b-9c2d-1e0f9a8b7c6d")
        .header("x-attempt-number", "1");
    if let Some(key) = event_key {
        builder = builder.header("x-event-key", key);
    }
    builder.body(body.into()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

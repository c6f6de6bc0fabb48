//! Response bodies for the API.

use chrono::{DateTime, Utc};
use hook_keeper_core::Uuid;
use serde::{Deserialize, Serialize};

/// Webhook dispatch response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookResponse {
    pub status: String,
    pub event_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_uuid: Option<Uuid>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub registered_events: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

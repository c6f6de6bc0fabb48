//! Configuration types for the HTTP service

use crate::errors::ConfigError;
use hook_keeper_core::EventKind;
use serde::{Deserialize, Serialize};

/// Service configuration
///
/// Every field carries a serde default so an empty configuration source
/// yields a working service.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Webhook dispatch settings
    pub webhooks: WebhookConfig,

    /// Security settings
    pub security: SecurityConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Check the configuration for values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "server.host must not be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be between 1 and 65535".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than zero".to_string(),
            });
        }

        if !self.webhooks.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhooks.endpoint_path '{}' must start with '/'",
                    self.webhooks.endpoint_path
                ),
            });
        }

        // Route syntax would make the path a pattern or panic the router
        let path = &self.webhooks.endpoint_path;
        if path.contains(['{', '}', '*']) || path.split('/').any(|s| s.starts_with(':')) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhooks.endpoint_path '{}' must be a literal path without '{{', '}}', '*' or ':' segments",
                    path
                ),
            });
        }

        if self.webhooks.endpoint_path == "/health" {
            return Err(ConfigError::Invalid {
                message: "webhooks.endpoint_path must not be '/health'".to_string(),
            });
        }

        if let Some(unknown) = self
            .webhooks
            .enabled_events
            .iter()
            .find(|key| EventKind::from_key(key).is_none())
        {
            return Err(ConfigError::Invalid {
                message: format!("webhooks.enabled_events contains unknown event key '{unknown}'"),
            });
        }

        Ok(())
    }

    /// Address to bind, as `host:port` (`[host]:port` for IPv6 hosts).
    pub fn bind_address(&self) -> String {
        if self.server.host.contains(':') {
            format!("[{}]:{}", self.server.host, self.server.port)
        } else {
            format!("{}:{}", self.server.host, self.server.port)
        }
    }

    /// Override host and port from a `host:port` listen address.
    ///
    /// An empty host (`:8080`) binds all interfaces.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the port is missing or not a number.
    pub fn apply_listen_address(&mut self, listen: &str) -> Result<(), ConfigError> {
        let (host, port) = listen
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::Invalid {
                message: format!("listen address '{listen}' must have the form host:port"),
            })?;

        let port = port.parse::<u16>().map_err(|_| ConfigError::Invalid {
            message: format!("listen address '{listen}' has an invalid port"),
        })?;

        self.server.host = if host.is_empty() {
            "0.0.0.0".to_string()
        } else {
            host.trim_start_matches('[').trim_end_matches(']').to_string()
        };
        self.server.port = port;
        Ok(())
    }

    /// Event kinds the logging handlers should be bound to.
    ///
    /// An empty `enabled_events` list means every known kind. Unknown keys
    /// are skipped; [`validate`](Self::validate) reports them.
    pub fn enabled_event_kinds(&self) -> Vec<EventKind> {
        if self.webhooks.enabled_events.is_empty() {
            return EventKind::ALL.to_vec();
        }

        self.webhooks
            .enabled_events
            .iter()
            .filter_map(|key| EventKind::from_key(key))
            .collect()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Webhook dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook endpoint path
    pub endpoint_path: String,

    /// Event keys to bind handlers for (empty = all)
    pub enabled_events: Vec<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/".to_string(),
            enabled_events: vec![],
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Log the headers of every inbound request at debug level
    pub log_requests: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

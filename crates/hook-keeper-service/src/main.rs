//! # Hook-Keeper Service
//!
//! Binary entry point for the Hook-Keeper webhook receiver.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Binds the logging handlers to the enabled event keys
//! - Starts the HTTP server from hook-keeper-api

mod configuration;
mod handlers;

use hook_keeper_api::{start_server, ServiceConfig, ServiceError};
use hook_keeper_core::EventRegistry;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let loaded = configuration::load_configuration();

    // Logging is configured from the loaded settings, so a configuration
    // failure is reported through the default subscriber.
    let logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => ServiceConfig::default().logging,
    };
    init_logging(&logging.level, logging.json_format);

    let service_config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Failed to load configuration; aborting");
            std::process::exit(3);
        }
    };

    info!("Starting Hook-Keeper Service");

    let registry = Arc::new(EventRegistry::new());
    handlers::register_logging_handlers(&registry, &service_config.enabled_event_kinds()).await;

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        endpoint = %service_config.webhooks.endpoint_path,
        "Starting HTTP server"
    );

    if let Err(e) = start_server(service_config, registry).await {
        error!("Server failed: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }
}

fn init_logging(level: &str, json_format: bool) {
    let registry = tracing_subscriber::registry().with(configuration::log_filter(level));

    if json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

//! Configuration loading for the service binary.
//!
//! Sources, applied in order (later sources override earlier ones):
//!  1. `/etc/hook-keeper/service.yaml`: system-wide defaults
//!  2. `./config/service.yaml`: deployment-local override
//!  3. The file named by `HK_CONFIG_FILE`: operator-specified file
//!  4. Environment variables prefixed `HK__` (double-underscore separator),
//!     e.g. `HK__SERVER__PORT=9090` sets `server.port`
//!  5. `LISTEN` (`host:port`), overriding `server.host` and `server.port`
//!
//! Absent files are skipped, so an unconfigured environment yields the
//! built-in defaults. A malformed file or a value of the wrong type is an
//! error.

use anyhow::Context;
use hook_keeper_api::ServiceConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_FILE_ENV: &str = "HK_CONFIG_FILE";

/// Environment variable carrying a `host:port` listen address.
pub const LISTEN_ENV: &str = "LISTEN";

/// Load and validate the service configuration.
pub fn load_configuration() -> anyhow::Result<ServiceConfig> {
    let mut builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/hook-keeper/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Some(path) = non_empty_env(CONFIG_FILE_ENV) {
        builder = builder.add_source(
            config::File::with_name(&path)
                .required(true)
                .format(config::FileFormat::Yaml),
        );
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("HK")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("webhooks.enabled_events")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut service_config: ServiceConfig = settings
        .try_deserialize()
        .context("Could not deserialize service configuration")?;

    if let Some(listen) = non_empty_env(LISTEN_ENV) {
        service_config
            .apply_listen_address(&listen)
            .with_context(|| format!("Invalid {LISTEN_ENV} value"))?;
    }

    service_config
        .validate()
        .context("Service configuration is invalid")?;

    Ok(service_config)
}

/// Tracing filter for the service.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// Hook-Keeper crates and `tower_http` logs at debug.
pub fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "hook_keeper_service={level},hook_keeper_api={level},hook_keeper_core={level},tower_http=debug"
        )
        .into()
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;

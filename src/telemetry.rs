//! Shared logging bootstrap for remotecheck binaries.

use crate::{Error, Result};

use std::sync::OnceLock;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_SERVICE: &str = "remotecheck";

static SERVICE: OnceLock<String> = OnceLock::new();

/// Service label attached to every metric.
pub fn service() -> &'static str {
    SERVICE.get().map(String::as_str).unwrap_or(DEFAULT_SERVICE)
}

/// Install the JSON tracing subscriber for a binary.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_for_component(service_name: &str, log_level: &str) -> Result<()> {
    let level = parse_log_level(log_level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .try_init()
        .map_err(|e| Error::Config(format!("failed to initialize logging subscriber: {e}")))?;

    let _ = SERVICE.set(service_name.to_string());
    info!(service_name, log_level = %level, "Logging initialized");
    Ok(())
}

pub fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(Error::Config(format!(
            "invalid log level '{other}', expected one of [trace, debug, info, warn, error]"
        ))),
    }
}

//! Configuration validation.
//!
//! Returns every problem found, not just the first. Runs before the config
//! is accepted into the system.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new("listener.bind_address", "not a socket address"));
    }

    if config.rpc.endpoint.is_empty() {
        errors.push(ValidationError::new(
            "rpc.endpoint",
            "required (set LEDGER_RPC_NODE_ENDPOINT)",
        ));
    } else if url::Url::parse(&config.rpc.endpoint).is_err() {
        errors.push(ValidationError::new("rpc.endpoint", "invalid URL"));
    }

    if config.rpc.token.is_empty() {
        errors.push(ValidationError::new(
            "rpc.token",
            format!("required to use {} (set LEDGER_TOKEN)", config.rpc.endpoint),
        ));
    }

    if url::Url::parse(&config.explorer.base_url).is_err() {
        errors.push(ValidationError::new("explorer.base_url", "invalid URL"));
    }

    for (field, secs) in [
        ("explorer.timeout_secs", config.explorer.timeout_secs),
        ("rpc.timeout_secs", config.rpc.timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.block_cache.enabled && config.block_cache.refresh_interval_secs == 0 {
        errors.push(ValidationError::new(
            "block_cache.refresh_interval_secs",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new("observability.metrics_address", "not a socket address"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto a config.
///
/// | Variable | Field |
/// |---|---|
/// | `LEDGER_RPC_NODE_ENDPOINT` | `rpc.endpoint` |
/// | `LEDGER_TOKEN` | `rpc.token` |
/// | `RPC_VERSION` | `rpc.version` |
/// | `PROVIDER` | `provider.name` |
/// | `EXPLORER_URL` | `explorer.base_url` |
/// | `PORT` | port of `listener.bind_address` |
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> GatewayConfig
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(endpoint) = var("LEDGER_RPC_NODE_ENDPOINT") {
        config.rpc.endpoint = endpoint;
    }
    if let Some(token) = var("LEDGER_TOKEN") {
        config.rpc.token = token;
    }
    if let Some(version) = var("RPC_VERSION") {
        config.rpc.version = version;
    }
    if let Some(name) = var("PROVIDER") {
        config.provider.name = name;
    }
    if let Some(url) = var("EXPLORER_URL") {
        config.explorer.base_url = url;
    }
    if let Some(port) = var("PORT") {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_env_overrides(
            GatewayConfig::default(),
            env(&[
                ("LEDGER_RPC_NODE_ENDPOINT", "http://node:8545"),
                ("LEDGER_TOKEN", "abc"),
                ("PORT", "9000"),
                ("PROVIDER", ""),
            ]),
        );
        assert_eq!(config.rpc.endpoint, "http://node:8545");
        assert_eq!(config.rpc.token, "abc");
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        // Empty values are ignored.
        assert_eq!(config.provider.name, "blockscout");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("explorer_gateway_load_test.toml");
        fs::write(
            &path,
            r#"
            [listener]
            bind_address = "127.0.0.1:7000"

            [rpc]
            endpoint = "http://localhost:8545"
            token = "t"
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.rpc.token, "t");

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/gateway.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = std::env::temp_dir().join("explorer_gateway_malformed_test.toml");
        fs::write(&path, "[rpc\nendpoint = ").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error: "));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = ConfigError::Validation(vec![
            ValidationError {
                field: "rpc.endpoint",
                message: "invalid URL".to_string(),
            },
            ValidationError {
                field: "rpc.token",
                message: "required".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: rpc.endpoint: invalid URL, rpc.token: required"
        );
    }
}

//! Structured logging.

use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &ObservabilityConfig) {
    let default_filter = format!("explorer_gateway={},tower_http=info", config.log_level);

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Log a completed upstream call.
pub fn log_upstream_call(api: &'static str, url: &str, action: &str, status: u16, start: Instant) {
    tracing::info!(
        api,
        url,
        action,
        status,
        duration_ms = start.elapsed().as_millis() as u64,
        "Upstream call"
    );
}

/// Log a failed upstream call with its concise error message.
pub fn log_upstream_error(api: &'static str, url: &str, action: &str, error: &str, start: Instant) {
    tracing::warn!(
        api,
        url,
        action,
        error,
        duration_ms = start.elapsed().as_millis() as u64,
        "Upstream call failed"
    );
}

/// Extract the message an upstream conveyed in a failed response body.
///
/// Prefers a string `error` field, then `error.message`, then `message`.
pub fn concise_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match &value["error"] {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(obj) => obj.get("message")?.as_str().map(str::to_string),
        _ => value["message"].as_str().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concise_error() {
        assert_eq!(concise_error(r#"{"error":"rate limited"}"#).as_deref(), Some("rate limited"));
        assert_eq!(
            concise_error(r#"{"error":{"code":-32000,"message":"nope"}}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(concise_error(r#"{"message":"NOTOK"}"#).as_deref(), Some("NOTOK"));
        assert_eq!(concise_error("<html>bad gateway</html>"), None);
    }
}

//! Shared utilities for integration testing.
//!
//! One wiremock server stands in for both upstreams: the explorer under
//! `/api` and the node under `/rpc`.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use explorer_gateway::config::GatewayConfig;
use explorer_gateway::http::HttpServer;
use explorer_gateway::lifecycle::Shutdown;
use explorer_gateway::select_provider;

pub const TOKEN: &str = "test-token";

/// Gateway configuration pointing at the mock upstreams.
pub fn gateway_config(upstream: &MockServer) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.explorer.base_url = format!("{}/api", upstream.uri());
    config.explorer.timeout_secs = 2;
    config.rpc.endpoint = format!("{}/rpc", upstream.uri());
    config.rpc.token = TOKEN.to_string();
    config.rpc.timeout_secs = 2;
    config
}

/// Answer one explorer action with a JSON body.
pub async fn mount_explorer(upstream: &MockServer, action: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("action", action))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(upstream)
        .await;
}

/// Answer a list action with `status: "1"` and the given entries.
pub async fn mount_explorer_list(upstream: &MockServer, action: &str, entries: Value) {
    mount_explorer(
        upstream,
        action,
        json!({"status": "1", "message": "OK", "result": entries}),
    )
    .await;
}

/// Answer one node method with a JSON-RPC result.
pub async fn mount_rpc(upstream: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "jsonrpc": "2.0", "id": "0", "result": result })),
        )
        .mount(upstream)
        .await;
}

/// Start the gateway on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let provider = select_provider(&config).unwrap();
    provider.init(shutdown.subscribe());

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, provider);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

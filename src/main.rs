//! Explorer Gateway
//!
//! Serves a uniform HTTP API over a block explorer and a JSON-RPC node.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (router, middleware, handlers)
//!                         │
//!                         ▼
//!                     providers (Provider trait, blockscout)
//!                      │        │            │
//!                      ▼        ▼            ▼
//!                 explorer   blockchain   reconcile
//!                 (GET API)  (JSON-RPC)   (history merge)
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

use clap::Parser;
use std::path::PathBuf;

use explorer_gateway::config::loader::load_config;
use explorer_gateway::lifecycle::startup;
use explorer_gateway::observability::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "explorer-gateway",
    version,
    about = "HTTP gateway over a block explorer and a JSON-RPC node"
)]
struct Args {
    /// Path to a TOML configuration file. Defaults and environment
    /// variables are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "explorer-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        provider = %config.provider.name,
        explorer = %config.explorer.base_url,
        block_cache = config.block_cache.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

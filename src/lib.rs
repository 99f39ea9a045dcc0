//! HTTP gateway over a block explorer and a JSON-RPC node.

pub mod blockchain;
pub mod config;
pub mod explorer;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod providers;
pub mod reconcile;

pub use blockchain::types::{GatewayError, GatewayResult, Transaction};
pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use providers::{select_provider, Provider};

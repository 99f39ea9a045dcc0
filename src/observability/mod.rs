//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream adapters (explorer, rpc) and the HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - One log event per upstream call, with duration and status or error
//! - Upstream errors are logged as a concise message, never the full chain
//! - Request ID flows from the HTTP layer into every span

pub mod logging;
pub mod metrics;

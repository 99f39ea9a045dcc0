//! Chain data model and node access.
//!
//! # Data Flow
//! ```text
//! upstream numeric strings (decimal or 0x hex)
//!     → numeric.rs (arbitrary-precision parse, canonical decimal)
//!     → types.rs (Transaction, Block, sub-collections)
//!
//! provider
//!     → client.rs (authenticated JSON-RPC POST with timeout)
//! ```
//!
//! # Security Constraints
//! - The node token is never logged

pub mod client;
pub mod numeric;
pub mod types;

pub use client::RpcClient;
pub use numeric::Encoding;
pub use types::{
    Block, BlockRef, Erc20Transfer, GatewayError, GatewayResult, InternalCall, Transaction,
    UnmatchedTransferPolicy,
};

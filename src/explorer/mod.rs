//! Block explorer integration.
//!
//! # Data Flow
//! ```text
//! module/action query
//!     → client.rs (GET, timeout, envelope interpretation)
//!     → raw.rs (loosely-typed payloads, every field optional)
//!     → raw.rs (explicit parse into Transaction / ParentedTransfer / ParentedCall)
//! ```

pub mod client;
pub mod raw;

pub use client::{BlockSource, ExplorerClient};
pub use raw::{
    ParentedCall, ParentedTransfer, RawInternalTransaction, RawTokenTransfer, RawTransaction,
};

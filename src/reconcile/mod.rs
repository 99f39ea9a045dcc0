//! Transaction reconciliation.
//!
//! # Data Flow
//! ```text
//! base transactions ─┐
//! token transfers ───┼→ engine.rs (fold attachments into the working set)
//! internal calls ────┘        │
//!                             ├→ working_set.rs (matched: file under parent)
//!                             └→ ParentResolver (unmatched: synthesize parent,
//!                                 then working_set.rs adopts it)
//! ```
//!
//! # Design Decisions
//! - Each pass owns its working set; nothing is cached between calls
//! - Parents are resolved sequentially, so the set has one writer
//! - A parent that cannot be resolved fails the pass, never drops silently

pub mod engine;
pub mod working_set;

pub use engine::{ParentResolver, Reconciler};
pub use working_set::{Attachment, Orphan, WorkingSet};

//! cachebust - action-driven cache invalidation registry
//!
//! Maps every state-changing game action to the cached API responses it makes
//! stale, clears them through a host-supplied cache store, and keeps an audit
//! trail of what was invalidated and when.
//!
//! # Features
//!
//! - **Closed action catalog**: namespaced `"<domain>:<name>"` identifiers backed by enums
//! - **Pattern dispatch**: each action clears a fixed, ordered set of URL prefixes
//! - **Tiered staleness**: returning to a hidden page clears data by how long it was away
//! - **Audit trail**: bounded in-memory log mirrored to session storage
//! - **Debug namespace**: process-wide handle for console-style inspection

// Public API modules
pub mod cachebust;
pub mod prelude;
pub mod registry;

// CLI module (for binary)
#[cfg(feature = "cli")]
pub mod cli;

// Re-export the public API at the crate root for convenience
pub use cachebust::{CacheBust, CacheBustBuilder};
pub use prelude::*;

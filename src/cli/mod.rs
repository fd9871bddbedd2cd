//! Command-line interface for the cache invalidation registry
//!
//! Lists the action catalog, previews pattern sets, dispatches actions against
//! a recording store and simulates visibility sweeps.

pub mod commands;
pub mod config;
pub mod errors;
pub mod output;

// Re-export commonly used types
pub use commands::*;
pub use config::CliConfig;
pub use errors::{CliError, CliResult};
pub use output::OutputFormat;

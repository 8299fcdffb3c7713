//! CLI module
//!
//! Command-line interface for the cache service.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP server and scheduled refreshes
//! - `refresh` - Run one sweep (or force one key)
//! - `get` - Read a tracked resource through the cache
//! - `keys` - List stored keys
//! - `clear` - Remove cached entries
//! - `resources` - List tracked resources

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, DEFAULT_CONFIG_FILE};
pub use runner::Runner;

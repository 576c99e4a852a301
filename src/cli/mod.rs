//! CLI module
//!
//! Command-line interface over the API client.
//!
//! # Commands
//!
//! - `list` - Page through objects of a kind
//! - `get` - Fetch one object
//! - `delete` - Delete one object
//! - `insert` - Append project log events
//! - `fetch` - Page through project log events

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

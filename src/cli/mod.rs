//! CLI module
//!
//! Command-line interface for the exporter.
//!
//! # Commands
//!
//! - `run-scheduler` - Enqueue daily exports
//! - `run-worker` - Run queued jobs
//! - `launch-export` - Enqueue one export now
//! - `convert` - Convert local dumps synchronously

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

//! CLI commands and argument parsing

use crate::tasks::{HIGH_QUEUE, LOW_QUEUE};
use crate::types::Flavor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Product and price dump exports to Parquet
#[derive(Parser, Debug)]
#[command(name = "off-exports")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); environment variables override it
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enqueue an export of every flavor each day at the configured time
    RunScheduler,

    /// Run jobs from the given queues, highest priority first
    RunWorker {
        /// Queue names
        #[arg(default_values = [HIGH_QUEUE, LOW_QUEUE])]
        queues: Vec<String>,

        /// Exit once the queues are empty
        #[arg(long)]
        burst: bool,
    },

    /// Enqueue one export job now
    LaunchExport {
        /// Flavor to export
        flavor: Flavor,
    },

    /// Convert local NDJSON dumps synchronously
    Convert {
        /// Flavor of the sources
        flavor: Flavor,

        /// Product dumps, or the price dump for the price flavor
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Proof dump (price flavor)
        #[arg(long)]
        proofs: Option<PathBuf>,

        /// Location dump (price flavor)
        #[arg(long)]
        locations: Option<PathBuf>,

        /// Output file (defaults to the flavor's file in the dataset directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Push the result when pushing is enabled
        #[arg(long)]
        push: bool,
    },
}

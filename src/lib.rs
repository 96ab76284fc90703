// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Product dump exports
//!
//! Converts newline-delimited JSON dumps of products and prices into
//! Parquet files with a fixed, strongly-typed schema per flavor.
//!
//! ## Features
//!
//! - **Reshape**: per-language text fields, image size maps, two generations
//!   of nutrient encodings and owner timestamps turned into fixed shapes
//! - **Lenient validation**: only the record identifier is mandatory; other
//!   fields are coerced or nulled
//! - **Streaming output**: fixed-size batches appended to one Parquet file,
//!   moved into place only when the conversion succeeds
//! - **Price join**: proofs and locations flattened onto each price, owners
//!   pseudonymized
//! - **Jobs**: dump download, file-spooled task queue, daily scheduler and
//!   artifact push to object storage
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use off_exports::{convert, Flavor, SourcePaths};
//! use std::path::Path;
//!
//! fn main() -> off_exports::Result<()> {
//!     let sources = SourcePaths::product("openfoodfacts-products.jsonl.gz");
//!     let stats = convert(Path::new("food.parquet"), &sources, Flavor::Food)?;
//!     println!("{} rows", stats.records_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  source  │ → │ reshape  │ → │ records  │ → │  engine  │ → │  output  │
//! │ NDJSON   │   │ language │   │ validate │   │ batches  │   │ Arrow    │
//! │ gzip     │   │ images   │   │ coerce   │   │ price    │   │ Parquet  │
//! │          │   │ nutrients│   │          │   │ join     │   │ push     │
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘   └──────────┘
//!                                     ↑              ↑
//!                                  schema: flavor → record kind, Arrow schema
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the exporter
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration (YAML file + environment)
pub mod config;

/// NDJSON sources
pub mod source;

/// Pre-validation reshaping of raw records
pub mod reshape;

/// Canonical record types and validation
pub mod records;

/// Target schemas and the flavor registry
pub mod schema;

/// Arrow/Parquet output and artifact push
pub mod output;

/// Conversion engine
pub mod engine;

/// Upstream dump download
pub mod dataset;

/// Job queue, worker and scheduler
pub mod tasks;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ExportConfig;
pub use engine::{convert, ConvertOptions, ConvertStats, ExportEngine};
pub use schema::FlavorRegistry;
pub use source::SourcePaths;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! NDJSON source module
//!
//! Supports: plain and gzip-compressed NDJSON
//!
//! # Overview
//!
//! The source module locates the input dumps of a conversion and streams
//! them one JSON object per line. Compression is detected from the gzip
//! magic bytes or a `.gz` extension.

mod reader;
mod types;

pub use reader::JsonlReader;
pub use types::{Compression, SourcePaths};

#[cfg(test)]
mod tests;

//! Output module
//!
//! Handles Arrow RecordBatch creation, Parquet file writing and artifact push.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Transposing flat JSON rows into Arrow RecordBatches typed by an explicit schema
//! - Writing Parquet files atomically (temp file + rename)
//! - Pushing finished files to object storage (S3, R2, GCS, Azure, local)

mod columns;
mod push;
mod writer;

pub use columns::rows_to_batch;
pub use push::{check_artifact, push_artifact, CloudDestination, ARTIFACT_EXTENSION};
pub use writer::{ParquetWriter, ParquetWriterConfig, DEFAULT_ROW_GROUP_SIZE};

#[cfg(test)]
mod tests;

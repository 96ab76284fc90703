//! Engine types
//!
//! Options and statistics for one conversion.

use crate::output::ParquetWriterConfig;
use crate::types::ErrorStrategy;
use serde::Serialize;

/// Default number of records per batch
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Configuration for a conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Records transposed and written together
    pub batch_size: usize,
    /// What to do with records that fail validation
    pub on_invalid: ErrorStrategy,
    /// Parquet writer settings
    pub writer: ParquetWriterConfig,
    /// Close a row group after every batch
    pub flush_per_batch: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            on_invalid: ErrorStrategy::default(),
            writer: ParquetWriterConfig::default(),
            flush_per_batch: false,
        }
    }
}

impl ConvertOptions {
    /// Create options with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set batch size
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the invalid record strategy
    #[must_use]
    pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.on_invalid = strategy;
        self
    }

    /// Set writer configuration
    #[must_use]
    pub fn with_writer_config(mut self, writer: ParquetWriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Flush a row group after every batch
    #[must_use]
    pub fn with_flush_per_batch(mut self, flush: bool) -> Self {
        self.flush_per_batch = flush;
        self
    }
}

/// Statistics from a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    /// Non-blank source lines read from the main stream
    pub records_read: usize,
    /// Rows written to the output
    pub records_written: usize,
    /// Records dropped under [`ErrorStrategy::Skip`]
    pub records_skipped: usize,
    /// Batches appended to the output
    pub batches_written: usize,
    /// Price references with no matching proof or location
    pub join_misses: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ConvertStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a record read
    pub fn add_read(&mut self) {
        self.records_read += 1;
    }

    /// Count a skipped record
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Count a written batch of `rows` rows
    pub fn add_batch(&mut self, rows: usize) {
        self.batches_written += 1;
        self.records_written += rows;
    }

    /// Count an unresolved reference
    pub fn add_join_miss(&mut self) {
        self.join_misses += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

//! Batched columnar writer
//!
//! Buffers flat rows and appends them to the output one batch at a time.
//! The Parquet file is opened on the first batch. Dropping the writer
//! without [`BatchWriter::finish`] discards the partial output.

use super::types::{ConvertOptions, ConvertStats};
use crate::error::Result;
use crate::output::{rows_to_batch, ParquetWriter};
use crate::types::JsonObject;
use arrow::datatypes::SchemaRef;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub(crate) struct BatchWriter<'a> {
    output: PathBuf,
    schema: SchemaRef,
    options: &'a ConvertOptions,
    writer: Option<ParquetWriter>,
    pending: Vec<JsonObject>,
}

impl<'a> BatchWriter<'a> {
    pub(crate) fn new(output: &Path, schema: SchemaRef, options: &'a ConvertOptions) -> Self {
        Self {
            output: output.to_path_buf(),
            schema,
            options,
            writer: None,
            pending: Vec::with_capacity(options.batch_size),
        }
    }

    /// Queue one row, writing a batch once enough rows are pending
    pub(crate) fn push(&mut self, row: JsonObject, stats: &mut ConvertStats) -> Result<()> {
        self.pending.push(row);
        if self.pending.len() >= self.options.batch_size {
            self.write_pending(stats)?;
        }
        Ok(())
    }

    fn write_pending(&mut self, stats: &mut ConvertStats) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let batch = rows_to_batch(&self.pending, &self.schema)?;
        let flush = self.options.flush_per_batch;
        let writer = self.open()?;
        writer.write(&batch)?;
        if flush {
            writer.flush()?;
        }

        stats.add_batch(batch.num_rows());
        debug!(
            batch = stats.batches_written,
            rows = batch.num_rows(),
            "Wrote batch"
        );
        self.pending.clear();
        Ok(())
    }

    fn open(&mut self) -> Result<&mut ParquetWriter> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => ParquetWriter::new(
                &self.output,
                Arc::clone(&self.schema),
                &self.options.writer,
            )?,
        };
        Ok(self.writer.insert(writer))
    }

    /// Write what is left and move the file into place.
    ///
    /// A source with no valid record still produces a file carrying the
    /// schema and zero rows.
    pub(crate) fn finish(mut self, stats: &mut ConvertStats) -> Result<usize> {
        self.write_pending(stats)?;
        self.open()?;
        match self.writer.take() {
            Some(writer) => writer.close(),
            None => Ok(0),
        }
    }
}

impl Drop for BatchWriter<'_> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            debug!(path = %self.output.display(), "Discarding partial output");
            writer.abort();
        }
    }
}

//! Parquet file writer
//!
//! Writes Arrow RecordBatches into a temporary file next to the output and
//! renames it into place on close. An aborted or failed write never leaves
//! a partial file at the output path.

use crate::error::{Error, Result};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default maximum rows per row group
pub const DEFAULT_ROW_GROUP_SIZE: usize = 122_880;

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            dictionary_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Build writer properties. Nothing time-dependent goes into the file
    /// metadata.
    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_dictionary_enabled(self.dictionary_enabled)
            .set_created_by(format!("{} {}", crate::NAME, crate::VERSION))
            .build()
    }
}

/// Parquet file writer
pub struct ParquetWriter {
    /// Arrow writer over the temporary file
    writer: ArrowWriter<File>,
    /// Where the file is being written
    temp_path: PathBuf,
    /// Where the file lands on close
    target_path: PathBuf,
    /// Number of rows written
    rows_written: usize,
}

impl ParquetWriter {
    /// Create a new Parquet writer for `path`.
    ///
    /// The parent directory is created if needed.
    pub fn new(
        path: impl AsRef<Path>,
        schema: SchemaRef,
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        let target_path = path.as_ref().to_path_buf();
        if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::output(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let temp_path = temp_path_for(&target_path);
        let file = File::create(&temp_path)
            .map_err(|e| Error::output(format!("Failed to create file: {e}")))?;

        let props = config.build_properties();
        let writer = match ArrowWriter::try_new(file, schema, Some(props)) {
            Ok(writer) => writer,
            Err(e) => {
                let _ = std::fs::remove_file(&temp_path);
                return Err(Error::output(format!(
                    "Failed to create Parquet writer: {e}"
                )));
            }
        };

        Ok(Self {
            writer,
            temp_path,
            target_path,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch to the file
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer
            .write(batch)
            .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;

        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Close the current row group, even if it is not full
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::output(format!("Failed to flush row group: {e}")))
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Finalize the file and move it to the output path
    pub fn close(self) -> Result<usize> {
        let rows = self.rows_written;
        if let Err(e) = self.writer.close() {
            let _ = std::fs::remove_file(&self.temp_path);
            return Err(Error::output(format!(
                "Failed to close Parquet writer: {e}"
            )));
        }

        // Write to temp file first, then rename for atomicity
        std::fs::rename(&self.temp_path, &self.target_path).map_err(|e| {
            let _ = std::fs::remove_file(&self.temp_path);
            Error::output(format!(
                "Failed to move output into place at {}: {e}",
                self.target_path.display()
            ))
        })?;
        Ok(rows)
    }

    /// Discard everything written so far
    pub fn abort(self) {
        drop(self.writer);
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            tracing::warn!(
                path = %self.temp_path.display(),
                error = %e,
                "Failed to remove temporary output"
            );
        }
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

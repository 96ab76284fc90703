//! Conversion engine module
//!
//! Streams NDJSON sources through reshape and validation into one Parquet
//! file per call.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ExportEngine` - resolves a flavor and runs its conversion
//! - `ConvertOptions` - batch size, invalid record strategy, writer settings
//! - `ConvertStats` - counters returned by every conversion
//!
//! Batches are written strictly in source order. The output appears at its
//! final path only once the whole conversion has succeeded.

mod batch;
mod prices;
mod types;

pub use types::{ConvertOptions, ConvertStats, DEFAULT_BATCH_SIZE};

use crate::error::{Error, Result};
use crate::records::{ProductKind, ProductRecord, RecordKind};
use crate::schema::{FlavorRegistry, FlavorSpec};
use crate::source::{JsonlReader, SourcePaths};
use crate::types::{ErrorStrategy, Flavor};
use batch::BatchWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Conversion engine
#[derive(Debug, Clone, Default)]
pub struct ExportEngine {
    /// Flavor descriptors
    registry: FlavorRegistry,
    /// Conversion options
    options: ConvertOptions,
}

impl ExportEngine {
    /// Create a new engine over a registry
    pub fn new(registry: FlavorRegistry) -> Self {
        Self {
            registry,
            options: ConvertOptions::default(),
        }
    }

    /// Set conversion options
    #[must_use]
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the conversion options
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Get the flavor registry
    pub fn registry(&self) -> &FlavorRegistry {
        &self.registry
    }

    /// Convert `sources` of `flavor` into a Parquet file at `output`.
    ///
    /// Every source must exist before anything is written. On failure no
    /// file is left at `output`.
    pub fn convert(
        &self,
        output: &Path,
        sources: &SourcePaths,
        flavor: Flavor,
    ) -> Result<ConvertStats> {
        let spec = self.registry.get(flavor)?;
        sources.ensure_exists()?;

        let start = Instant::now();
        info!(%flavor, output = %output.display(), "Starting conversion");

        let mut stats = match (spec.kind, sources) {
            (RecordKind::Product(kind), SourcePaths::Products { paths }) => {
                self.convert_products(spec, kind, paths, output)?
            }
            (
                RecordKind::Price,
                SourcePaths::Prices {
                    prices,
                    proofs,
                    locations,
                },
            ) => prices::convert_prices(self, spec, prices, proofs, locations, output)?,
            _ => {
                return Err(Error::config(format!(
                    "Flavor '{flavor}' cannot be converted from these sources"
                )))
            }
        };

        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        if stats.join_misses > 0 {
            warn!(
                %flavor,
                join_misses = stats.join_misses,
                "Some references could not be resolved"
            );
        }
        info!(
            %flavor,
            records = stats.records_written,
            skipped = stats.records_skipped,
            batches = stats.batches_written,
            duration_ms = stats.duration_ms,
            "Completed conversion"
        );

        Ok(stats)
    }

    fn convert_products(
        &self,
        spec: &FlavorSpec,
        kind: ProductKind,
        paths: &[PathBuf],
        output: &Path,
    ) -> Result<ConvertStats> {
        let mut stats = ConvertStats::new();
        let mut writer = BatchWriter::new(output, Arc::clone(&spec.schema), &self.options);

        for path in paths {
            for item in JsonlReader::open(path)? {
                stats.add_read();
                let row = item.and_then(|(line, raw)| {
                    ProductRecord::from_json(kind, raw, line, spec.language_fields)?.into_row()
                });
                match row {
                    Ok(row) => writer.push(row, &mut stats)?,
                    Err(e) => self.absorb(e, path, &mut stats)?,
                }
            }
        }

        writer.finish(&mut stats)?;
        Ok(stats)
    }

    /// Skip a record-level error under [`ErrorStrategy::Skip`], or fail
    fn absorb(&self, error: Error, path: &Path, stats: &mut ConvertStats) -> Result<()> {
        if self.options.on_invalid == ErrorStrategy::Skip && error.is_record_level() {
            warn!(source = %path.display(), %error, "Skipping invalid record");
            stats.add_skipped();
            Ok(())
        } else {
            Err(error)
        }
    }
}

/// Convert with the default registry and options
pub fn convert(output: &Path, sources: &SourcePaths, flavor: Flavor) -> Result<ConvertStats> {
    ExportEngine::default().convert(output, sources, flavor)
}

#[cfg(test)]
mod tests;

//! Source types
//!
//! Input locations of a conversion and the compression of a source file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Magic bytes opening every gzip member
pub(crate) const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain text NDJSON
    None,
    /// One or more concatenated gzip members
    Gzip,
}

impl Compression {
    /// Detect compression from the first bytes of the file, falling back
    /// to the file extension when the file is too short to tell.
    pub fn detect(path: &Path, head: &[u8]) -> Self {
        if head.starts_with(&GZIP_MAGIC) {
            return Compression::Gzip;
        }
        if head.len() < GZIP_MAGIC.len() && path.extension().is_some_and(|ext| ext == "gz") {
            return Compression::Gzip;
        }
        Compression::None
    }
}

/// Input files of one conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourcePaths {
    /// Product dumps, read in order into a single output
    Products { paths: Vec<PathBuf> },
    /// The price stream plus the two lookup streams it joins against
    Prices {
        prices: PathBuf,
        proofs: PathBuf,
        locations: PathBuf,
    },
}

impl SourcePaths {
    /// A single product dump
    pub fn product(path: impl Into<PathBuf>) -> Self {
        SourcePaths::Products {
            paths: vec![path.into()],
        }
    }

    /// Price dump with its proofs and locations
    pub fn prices(
        prices: impl Into<PathBuf>,
        proofs: impl Into<PathBuf>,
        locations: impl Into<PathBuf>,
    ) -> Self {
        SourcePaths::Prices {
            prices: prices.into(),
            proofs: proofs.into(),
            locations: locations.into(),
        }
    }

    /// Every file this conversion reads
    pub fn files(&self) -> Vec<&Path> {
        match self {
            SourcePaths::Products { paths } => paths.iter().map(PathBuf::as_path).collect(),
            SourcePaths::Prices {
                prices,
                proofs,
                locations,
            } => vec![prices, proofs, locations],
        }
    }

    /// Fail with [`Error::SourceNotFound`] unless every file exists
    pub fn ensure_exists(&self) -> Result<()> {
        let files = self.files();
        if files.is_empty() {
            return Err(Error::config("No source file given"));
        }
        match files.into_iter().find(|path| !path.is_file()) {
            Some(missing) => Err(Error::source_not_found(missing)),
            None => Ok(()),
        }
    }
}

//! Upstream dump download
//!
//! Each product flavor publishes one gzip NDJSON dump; prices publish three
//! (prices, proofs, locations). Downloads stream into `<name>.part` and are
//! renamed into place once complete.

use crate::config::DownloadConfig;
use crate::error::{Error, Result};
use crate::source::SourcePaths;
use crate::types::Flavor;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Price-domain dumps, in the order they are fetched
pub const PRICE_DUMPS: [&str; 3] = ["prices", "proofs", "locations"];

const PRICES_BASE_URL: &str = "https://prices.openfoodfacts.org/data";

/// One file to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpFile {
    pub url: String,
    pub file_name: String,
}

/// Upstream host and file name of a product flavor's dump
fn product_dump(flavor: Flavor) -> (&'static str, &'static str) {
    match flavor {
        Flavor::Beauty => (
            "https://static.openbeautyfacts.org/data",
            "openbeautyfacts-products.jsonl.gz",
        ),
        Flavor::Products => (
            "https://static.openproductsfacts.org/data",
            "openproductsfacts-products.jsonl.gz",
        ),
        Flavor::PetFood => (
            "https://static.openpetfoodfacts.org/data",
            "openpetfoodfacts-products.jsonl.gz",
        ),
        Flavor::Food | Flavor::Price => (
            "https://static.openfoodfacts.org/data",
            "openfoodfacts-products.jsonl.gz",
        ),
    }
}

/// Files making up a flavor's dump. With a mirror, every file is fetched
/// from `{mirror}/{file name}`.
pub fn dump_files(flavor: Flavor, mirror: Option<&str>) -> Vec<DumpFile> {
    let entries: Vec<(&str, String)> = if flavor.is_product() {
        let (base, name) = product_dump(flavor);
        vec![(base, name.to_string())]
    } else {
        PRICE_DUMPS
            .iter()
            .map(|dump| (PRICES_BASE_URL, format!("{dump}.jsonl.gz")))
            .collect()
    };

    entries
        .into_iter()
        .map(|(base, file_name)| {
            let base = mirror.unwrap_or(base).trim_end_matches('/');
            DumpFile {
                url: format!("{base}/{file_name}"),
                file_name,
            }
        })
        .collect()
}

/// Where a flavor's dump lives once downloaded into `dir`
pub fn source_paths(flavor: Flavor, dir: &Path) -> SourcePaths {
    let mut paths: Vec<PathBuf> = dump_files(flavor, None)
        .into_iter()
        .map(|file| dir.join(file.file_name))
        .collect();

    if flavor.is_product() {
        SourcePaths::Products { paths }
    } else {
        // Same order as PRICE_DUMPS
        let locations = paths.pop().unwrap_or_default();
        let proofs = paths.pop().unwrap_or_default();
        let prices = paths.pop().unwrap_or_default();
        SourcePaths::prices(prices, proofs, locations)
    }
}

/// Downloads dumps over HTTP
#[derive(Debug, Clone)]
pub struct DatasetFetcher {
    client: Client,
    mirror: Option<String>,
}

impl DatasetFetcher {
    /// Create a fetcher from download settings
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            client,
            mirror: config.mirror.clone(),
        })
    }

    /// Download every file of a flavor's dump into `dir`, replacing any
    /// previous copy
    pub async fn fetch(&self, flavor: Flavor, dir: &Path) -> Result<SourcePaths> {
        tokio::fs::create_dir_all(dir).await?;

        for file in dump_files(flavor, self.mirror.as_deref()) {
            let target = dir.join(&file.file_name);
            let bytes = self.download(&file.url, &target).await?;
            info!(%flavor, url = %file.url, bytes, "Downloaded dump");
        }

        Ok(source_paths(flavor, dir))
    }

    /// Stream `url` to `target` through a `.part` file
    async fn download(&self, url: &str, target: &Path) -> Result<u64> {
        let url = url::Url::parse(url)?;
        debug!(%url, "Downloading");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let part = part_path(target);
        let written = match write_stream(response, &part).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };

        tokio::fs::rename(&part, target).await?;
        Ok(written)
    }
}

async fn write_stream(response: reqwest::Response, part: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(part).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0_u64;

    while let Some(chunk) = stream.next().await {
        let chunk: Bytes = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

fn part_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    target.with_file_name(name)
}

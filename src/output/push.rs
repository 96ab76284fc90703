//! Artifact push to object storage (S3, R2, GCS, Azure, local)
//!
//! A finished export is uploaded under `{repository}/{file name}` in the
//! configured destination. Pushing is disabled unless explicitly enabled;
//! the local file stays the durable artifact either way.

use crate::config::PushConfig;
use crate::error::{Error, Result};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, WriteMultipart};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Extension every pushed artifact must carry
pub const ARTIFACT_EXTENSION: &str = "parquet";

/// Size of each chunk read from disk during upload
const UPLOAD_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// In-flight parts allowed during a multipart upload
const UPLOAD_CONCURRENCY: usize = 4;

/// Cloud storage destination parsed from URL
#[derive(Debug, Clone)]
pub struct CloudDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl CloudDestination {
    /// Parse a destination URL and create appropriate object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if let Some(rest) = url.strip_prefix("s3://") {
            Self::parse_s3(rest, false)
        } else if let Some(rest) = url.strip_prefix("r2://") {
            Self::parse_s3(rest, true)
        } else if let Some(rest) = url.strip_prefix("gs://") {
            Self::parse_gcs(rest)
        } else if let Some(rest) = url.strip_prefix("az://") {
            Self::parse_azure(rest)
        } else {
            Self::parse_local(url)
        }
    }

    fn parse_s3(without_scheme: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, prefix) = split_bucket(without_scheme);

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // AWS_ENDPOINT is read by from_env(); R2 also honours its own variable
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: scheme.to_string(),
        })
    }

    fn parse_gcs(without_scheme: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(without_scheme);

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
        })
    }

    fn parse_azure(without_scheme: &str) -> Result<Self> {
        let (container, prefix) = split_bucket(without_scheme);

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
        })
    }

    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    fn object_path(&self, remote: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(remote)
        } else {
            ObjectPath::from(format!("{}/{remote}", self.prefix.trim_end_matches('/')))
        }
    }

    /// Stream a local file to `remote` with a multipart upload.
    ///
    /// Returns the full destination path for logging.
    pub async fn upload_file(&self, local: &Path, remote: &str) -> Result<String> {
        let path = self.object_path(remote);
        let mut file = tokio::fs::File::open(local).await?;

        let upload = self.store.put_multipart(&path).await?;
        let mut writer = WriteMultipart::new(upload);
        let mut buffer = vec![0_u8; UPLOAD_CHUNK_SIZE];

        loop {
            let read = match file.read(&mut buffer).await {
                Ok(read) => read,
                Err(e) => {
                    let _ = writer.abort().await;
                    return Err(Error::upload(format!(
                        "Failed to read {}: {e}",
                        local.display()
                    )));
                }
            };
            if read == 0 {
                break;
            }
            writer.wait_for_capacity(UPLOAD_CONCURRENCY).await?;
            writer.write(&buffer[..read]);
        }

        writer
            .finish()
            .await
            .map_err(|e| Error::upload(format!("Failed to write {path}: {e}")))?;

        Ok(format!("{}://{path}", self.scheme))
    }
}

fn split_bucket(without_scheme: &str) -> (&str, String) {
    match without_scheme.split_once('/') {
        Some((bucket, prefix)) => (bucket, prefix.to_string()),
        None => (without_scheme, String::new()),
    }
}

/// Validate a finished artifact and return its remote file name.
///
/// The file must exist and carry the `.parquet` extension.
pub fn check_artifact(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::upload(format!(
            "Artifact is missing: {}",
            path.display()
        )));
    }
    if path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXTENSION) {
        return Err(Error::upload(format!(
            "A .{ARTIFACT_EXTENSION} file is expected, got {}",
            path.display()
        )));
    }
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::upload(format!("Invalid artifact name: {}", path.display())))
}

/// Push a finished export under `{repository}/{file name}`.
///
/// Returns `None` without touching the file when pushing is disabled.
pub async fn push_artifact(
    config: &PushConfig,
    path: &Path,
    repository: &str,
) -> Result<Option<String>> {
    if !config.enabled {
        info!(path = %path.display(), "Artifact push is disabled");
        return Ok(None);
    }

    let file_name = check_artifact(path)?;
    let destination = CloudDestination::parse(&config.destination)?;

    info!(repository, destination = destination.scheme(), "Pushing artifact");
    let remote = format!("{}/{file_name}", repository.trim_matches('/'));
    let pushed = destination.upload_file(path, &remote).await?;
    info!(target_path = %pushed, "Artifact pushed");

    Ok(Some(pushed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(destination: &Path) -> PushConfig {
        PushConfig {
            enabled: true,
            destination: destination.display().to_string(),
        }
    }

    #[test]
    fn test_parse_local_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().to_str().unwrap();
        let dest = CloudDestination::parse(path).unwrap();
        assert_eq!(dest.scheme(), "file");
        assert!(!dest.is_cloud());
    }

    #[test]
    fn test_split_bucket() {
        assert_eq!(split_bucket("bucket/a/b"), ("bucket", "a/b".to_string()));
        assert_eq!(split_bucket("bucket"), ("bucket", String::new()));
    }

    #[test]
    fn test_check_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("food.parquet");
        assert!(check_artifact(&missing).is_err());

        let wrong = dir.path().join("food.csv");
        std::fs::write(&wrong, b"x").unwrap();
        assert!(check_artifact(&wrong).is_err());

        std::fs::write(&missing, b"PAR1").unwrap();
        assert_eq!(check_artifact(&missing).unwrap(), "food.parquet");
    }

    #[tokio::test]
    async fn test_push_disabled_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let config = PushConfig {
            enabled: false,
            destination: dir.path().join("remote").display().to_string(),
        };
        // Missing file is fine: nothing is checked when disabled
        let pushed = push_artifact(&config, &dir.path().join("nope.parquet"), "repo")
            .await
            .unwrap();
        assert!(pushed.is_none());
        assert!(!dir.path().join("remote").exists());
    }

    #[tokio::test]
    async fn test_push_to_local_destination() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("prices.parquet");
        std::fs::write(&artifact, b"PAR1 payload PAR1").unwrap();
        let remote = dir.path().join("remote");

        let pushed = push_artifact(&enabled(&remote), &artifact, "openfoodfacts/open-prices")
            .await
            .unwrap();

        assert!(pushed.is_some());
        let uploaded = remote.join("openfoodfacts/open-prices/prices.parquet");
        assert_eq!(std::fs::read(uploaded).unwrap(), b"PAR1 payload PAR1");
    }

    #[tokio::test]
    async fn test_push_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("food.jsonl");
        std::fs::write(&artifact, b"{}").unwrap();

        let err = push_artifact(&enabled(&dir.path().join("remote")), &artifact, "repo")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upload { .. }));
    }
}

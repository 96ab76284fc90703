//! Configuration for the exporter
//!
//! `ExportConfig` is read from an optional YAML file, then overridden from
//! environment variables. It is loaded once by the CLI and passed down
//! explicitly.

use crate::engine::{ConvertOptions, DEFAULT_BATCH_SIZE};
use crate::error::{Error, Result, ResultExt};
use crate::output::{ParquetWriterConfig, DEFAULT_ROW_GROUP_SIZE};
use crate::types::{ErrorStrategy, Flavor};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable names
pub mod env {
    pub const DATASET_DIR: &str = "OFF_EXPORTS_DATASET_DIR";
    pub const SPOOL_DIR: &str = "OFF_EXPORTS_SPOOL_DIR";
    pub const BATCH_SIZE: &str = "OFF_EXPORTS_BATCH_SIZE";
    pub const ROW_GROUP_SIZE: &str = "OFF_EXPORTS_ROW_GROUP_SIZE";
    pub const ON_INVALID_RECORD: &str = "OFF_EXPORTS_ON_INVALID_RECORD";
    pub const ENABLE_PUSH: &str = "ENABLE_PUSH";
    pub const PUSH_DESTINATION: &str = "OFF_EXPORTS_PUSH_DESTINATION";
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Where downloaded dumps and exported files live
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: PathBuf,

    /// Root of the file-spooled job queues
    #[serde(default = "default_spool_dir")]
    pub spool_dir: PathBuf,

    /// Conversion tuning
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Artifact push
    #[serde(default)]
    pub push: PushConfig,

    /// Daily export schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Upstream dump download
    #[serde(default)]
    pub download: DownloadConfig,

    /// Worker polling
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dataset_dir: default_dataset_dir(),
            spool_dir: default_spool_dir(),
            conversion: ConversionConfig::default(),
            push: PushConfig::default(),
            schedule: ScheduleConfig::default(),
            download: DownloadConfig::default(),
            worker: WorkerConfig::default(),
        }
    }
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from("datasets")
}

fn default_spool_dir() -> PathBuf {
    PathBuf::from("spool")
}

impl ExportConfig {
    /// Load config from an optional YAML file, then apply the process
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };
        config.apply_env_from(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(env::DATASET_DIR) {
            self.dataset_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(env::SPOOL_DIR) {
            self.spool_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup(env::BATCH_SIZE) {
            self.conversion.batch_size = parse_env(env::BATCH_SIZE, &size)?;
        }
        if let Some(size) = lookup(env::ROW_GROUP_SIZE) {
            self.conversion.row_group_size = parse_env(env::ROW_GROUP_SIZE, &size)?;
        }
        if let Some(strategy) = lookup(env::ON_INVALID_RECORD) {
            self.conversion.on_invalid_record = ErrorStrategy::from_str(&strategy)?;
        }
        if let Some(flag) = lookup(env::ENABLE_PUSH) {
            self.push.enabled = parse_flag(&flag);
        }
        if let Some(destination) = lookup(env::PUSH_DESTINATION) {
            self.push.destination = destination;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.conversion.batch_size == 0 {
            return Err(Error::invalid_config("batch_size", "must be at least 1"));
        }
        if self.conversion.row_group_size == 0 {
            return Err(Error::invalid_config("row_group_size", "must be at least 1"));
        }
        if self.push.enabled && self.push.destination.trim().is_empty() {
            return Err(Error::invalid_config(
                "push.destination",
                "required when push is enabled",
            ));
        }
        if self.schedule.hour > 23 || self.schedule.minute > 59 {
            return Err(Error::invalid_config(
                "schedule",
                format!(
                    "{:02}:{:02} is not a valid time of day",
                    self.schedule.hour, self.schedule.minute
                ),
            ));
        }
        if self.worker.poll_interval_ms == 0 {
            return Err(Error::invalid_config(
                "worker.poll_interval_ms",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Where a flavor's export lands
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.dataset_dir.join(file_name)
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::invalid_config(name, format!("'{value}': {e}")))
}

/// `1`, `true`, `on` and `yes` enable a flag; anything else disables it
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

// ============================================================================
// Conversion Config
// ============================================================================

/// Conversion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Records per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum rows per row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,

    /// What to do with invalid records
    #[serde(default)]
    pub on_invalid_record: ErrorStrategy,

    /// Close a row group after each batch
    #[serde(default)]
    pub flush_per_batch: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            row_group_size: default_row_group_size(),
            on_invalid_record: ErrorStrategy::default(),
            flush_per_batch: false,
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_row_group_size() -> usize {
    DEFAULT_ROW_GROUP_SIZE
}

impl ConversionConfig {
    /// Engine options for this config
    pub fn to_options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_batch_size(self.batch_size)
            .with_error_strategy(self.on_invalid_record)
            .with_flush_per_batch(self.flush_per_batch)
            .with_writer_config(ParquetWriterConfig::new().with_row_group_size(self.row_group_size))
    }
}

// ============================================================================
// Push Config
// ============================================================================

/// Artifact push configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether finished exports are pushed at all
    #[serde(default)]
    pub enabled: bool,

    /// Destination URL (`s3://`, `r2://`, `gs://`, `az://` or a local path)
    #[serde(default)]
    pub destination: String,
}

// ============================================================================
// Schedule Config
// ============================================================================

/// Daily export schedule, in UTC
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_hour")]
    pub hour: u32,

    #[serde(default)]
    pub minute: u32,

    /// Flavors exported on each run
    #[serde(default = "default_flavors")]
    pub flavors: Vec<Flavor>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: default_hour(),
            minute: 0,
            flavors: default_flavors(),
        }
    }
}

fn default_hour() -> u32 {
    16
}

fn default_flavors() -> Vec<Flavor> {
    Flavor::ALL.to_vec()
}

// ============================================================================
// Download Config
// ============================================================================

/// Upstream dump download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Whole-download timeout
    #[serde(default = "default_download_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Fetch every dump from `{mirror}/{file name}` instead of upstream
    #[serde(default)]
    pub mirror: Option<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_download_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            mirror: None,
        }
    }
}

fn default_download_timeout() -> u64 {
    3600
}

fn default_connect_timeout() -> u64 {
    30
}

// ============================================================================
// Worker Config
// ============================================================================

/// Worker polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Sleep between polls of empty queues
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.conversion.batch_size, 1024);
        assert_eq!(config.conversion.row_group_size, 122_880);
        assert_eq!(config.conversion.on_invalid_record, ErrorStrategy::Fail);
        assert!(!config.push.enabled);
        assert_eq!((config.schedule.hour, config.schedule.minute), (16, 0));
        assert_eq!(config.schedule.flavors.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
dataset_dir: /srv/exports
conversion:
  batch_size: 500
  on_invalid_record: skip
push:
  enabled: true
  destination: s3://bucket/exports
schedule:
  flavors: [food, price]
"#;
        let config = ExportConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.dataset_dir, PathBuf::from("/srv/exports"));
        assert_eq!(config.conversion.batch_size, 500);
        assert_eq!(config.conversion.row_group_size, 122_880);
        assert_eq!(config.conversion.on_invalid_record, ErrorStrategy::Skip);
        assert!(config.push.enabled);
        assert_eq!(config.schedule.hour, 16);
        assert_eq!(config.schedule.flavors, vec![Flavor::Food, Flavor::Price]);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ExportConfig::default();
        config
            .apply_env_from(lookup(&[
                (env::BATCH_SIZE, "64"),
                (env::ON_INVALID_RECORD, "skip"),
                (env::ENABLE_PUSH, "on"),
                (env::PUSH_DESTINATION, "/tmp/push"),
                (env::DATASET_DIR, "/data"),
            ]))
            .unwrap();

        assert_eq!(config.conversion.batch_size, 64);
        assert_eq!(config.conversion.on_invalid_record, ErrorStrategy::Skip);
        assert!(config.push.enabled);
        assert_eq!(config.push.destination, "/tmp/push");
        assert_eq!(config.output_path("food.parquet"), PathBuf::from("/data/food.parquet"));
    }

    #[test]
    fn test_env_invalid_number() {
        let mut config = ExportConfig::default();
        let err = config
            .apply_env_from(lookup(&[(env::BATCH_SIZE, "lots")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_validate_rejects_push_without_destination() {
        let mut config = ExportConfig::default();
        config.push.enabled = true;
        assert!(config.validate().is_err());
        config.push.destination = "s3://bucket".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_schedule() {
        let mut config = ExportConfig::default();
        config.schedule.hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_options() {
        let mut conversion = ConversionConfig::default();
        conversion.batch_size = 10;
        conversion.row_group_size = 20;
        let options = conversion.to_options();
        assert_eq!(options.batch_size, 10);
        assert_eq!(options.writer.row_group_size(), 20);
    }
}

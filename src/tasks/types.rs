//! Job types
//!
//! Jobs are serialized as JSON files in the spool. A job may carry a `then`
//! follow-on that is enqueued only once it succeeds.

use crate::source::SourcePaths;
use crate::types::Flavor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Queue for scheduled exports and their follow-ups
pub const HIGH_QUEUE: &str = "off-exports-high";

/// Queue for work that can wait
pub const LOW_QUEUE: &str = "off-exports-low";

/// Queues a worker listens to by default, highest priority first
pub const DEFAULT_QUEUES: [&str; 2] = [HIGH_QUEUE, LOW_QUEUE];

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// What a job does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobKind {
    /// Download a flavor's dump, then convert and push it
    Export { flavor: Flavor },
    /// Convert local sources into `output`
    Convert {
        flavor: Flavor,
        sources: SourcePaths,
        output: PathBuf,
    },
    /// Push a finished export
    Push { flavor: Flavor, path: PathBuf },
}

/// A unit of work in a spool queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Sortable unique id; also the spool file stem
    pub id: String,
    pub kind: JobKind,
    /// Enqueued on the same queue after this job succeeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<Box<Job>>,
    pub enqueued_at: DateTime<Utc>,
}

impl Job {
    /// Create a job with a fresh id
    pub fn new(kind: JobKind) -> Self {
        let now = Utc::now();
        let sequence = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!(
                "{:020}-{}-{sequence:06}",
                now.timestamp_micros(),
                std::process::id()
            ),
            kind,
            then: None,
            enqueued_at: now,
        }
    }

    /// Chain a follow-on job
    #[must_use]
    pub fn then(mut self, next: Job) -> Self {
        self.then = Some(Box::new(next));
        self
    }

    /// Short label for logs
    pub fn describe(&self) -> String {
        match &self.kind {
            JobKind::Export { flavor } => format!("export {flavor}"),
            JobKind::Convert { flavor, .. } => format!("convert {flavor}"),
            JobKind::Push { flavor, .. } => format!("push {flavor}"),
        }
    }
}

/// Counters from a worker run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub succeeded: usize,
    pub failed: usize,
}

//! File-spooled job queue
//!
//! Layout under `<root>/<queue>/`:
//! - `pending/` jobs waiting, claimed in file name order
//! - `running/` jobs claimed by a worker
//! - `failed/` jobs that errored, kept for inspection
//!
//! A job is claimed by renaming it from `pending/` to `running/`, so two
//! workers never run the same job.

use super::types::Job;
use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

const PENDING: &str = "pending";
const RUNNING: &str = "running";
const FAILED: &str = "failed";
const JOB_EXTENSION: &str = "json";

/// A job taken off the queue, backed by its file in `running/`
#[derive(Debug)]
pub struct ClaimedJob {
    pub job: Job,
    path: PathBuf,
}

/// One named queue in the spool directory
#[derive(Debug, Clone)]
pub struct SpoolQueue {
    name: String,
    dir: PathBuf,
}

impl SpoolQueue {
    /// Open (creating if needed) the queue `name` under `root`
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(Error::queue(format!("Invalid queue name '{name}'")));
        }
        let dir = root.join(name);
        for state in [PENDING, RUNNING, FAILED] {
            fs::create_dir_all(dir.join(state)).map_err(|e| {
                Error::queue(format!("Failed to create {}: {e}", dir.join(state).display()))
            })?;
        }
        Ok(Self {
            name: name.to_string(),
            dir,
        })
    }

    /// Queue name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn job_file(&self, state: &str, id: &str) -> PathBuf {
        self.dir.join(state).join(format!("{id}.{JOB_EXTENSION}"))
    }

    /// Add a job to the queue
    pub fn enqueue(&self, job: &Job) -> Result<()> {
        let target = self.job_file(PENDING, &job.id);
        // Hidden temp name so a half-written job is never claimed
        let temp = self.dir.join(PENDING).join(format!(".{}.tmp", job.id));

        let content = serde_json::to_vec_pretty(job)?;
        fs::write(&temp, content)
            .and_then(|()| fs::rename(&temp, &target))
            .map_err(|e| Error::queue(format!("Failed to enqueue job {}: {e}", job.id)))?;

        tracing::info!(queue = %self.name, job = %job.id, task = %job.describe(), "Enqueued job");
        Ok(())
    }

    /// Ids of pending jobs, oldest first
    pub fn pending(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(self.dir.join(PENDING))
            .map_err(|e| Error::queue(format!("Failed to list queue {}: {e}", self.name)))?;

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == JOB_EXTENSION))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .filter(|id| !id.starts_with('.'))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Take the oldest pending job, if any
    pub fn claim(&self) -> Result<Option<ClaimedJob>> {
        for id in self.pending()? {
            let running = self.job_file(RUNNING, &id);
            match fs::rename(self.job_file(PENDING, &id), &running) {
                Ok(()) => {}
                // Claimed by another worker in the meantime
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::queue(format!("Failed to claim job {id}: {e}"))),
            }

            let parsed = fs::read(&running)
                .map_err(Error::from)
                .and_then(|content| serde_json::from_slice::<Job>(&content).map_err(Error::from));
            match parsed {
                Ok(job) => return Ok(Some(ClaimedJob { job, path: running })),
                Err(e) => {
                    warn!(
                        queue = %self.name,
                        job = %id,
                        error = %e,
                        "Unreadable job moved to failed"
                    );
                    self.move_to_failed(&running, &id)?;
                }
            }
        }
        Ok(None)
    }

    /// Drop a job that succeeded
    pub fn complete(&self, claimed: ClaimedJob) -> Result<()> {
        fs::remove_file(&claimed.path)
            .map_err(|e| Error::queue(format!("Failed to complete job {}: {e}", claimed.job.id)))
    }

    /// Keep a job that failed in `failed/`
    pub fn fail(&self, claimed: ClaimedJob) -> Result<()> {
        self.move_to_failed(&claimed.path, &claimed.job.id)
    }

    /// Ids of failed jobs
    pub fn failed(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(self.dir.join(FAILED))
            .map_err(|e| Error::queue(format!("Failed to list queue {}: {e}", self.name)))?;
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn move_to_failed(&self, running: &Path, id: &str) -> Result<()> {
        fs::rename(running, self.job_file(FAILED, id))
            .map_err(|e| Error::queue(format!("Failed to move job {id} to failed: {e}")))
    }
}

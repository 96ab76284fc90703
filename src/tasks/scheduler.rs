//! Daily export scheduler

use super::queue::SpoolQueue;
use super::types::{Job, JobKind};
use crate::config::ScheduleConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::info;

/// First occurrence of `hour:minute` UTC strictly after `now`
pub fn next_run_after(now: DateTime<Utc>, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
    let today = now
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| Error::invalid_config("schedule", format!("{hour:02}:{minute:02}")))?
        .and_utc();

    if today > now {
        Ok(today)
    } else {
        Ok(today + ChronoDuration::days(1))
    }
}

/// Enqueues one export job per configured flavor every day
#[derive(Debug)]
pub struct Scheduler {
    queue: SpoolQueue,
    schedule: ScheduleConfig,
}

impl Scheduler {
    pub fn new(queue: SpoolQueue, schedule: ScheduleConfig) -> Self {
        Self { queue, schedule }
    }

    /// Enqueue the export jobs of one run
    pub fn enqueue_exports(&self) -> Result<Vec<Job>> {
        let jobs: Vec<Job> = self
            .schedule
            .flavors
            .iter()
            .map(|&flavor| Job::new(JobKind::Export { flavor }))
            .collect();
        for job in &jobs {
            self.queue.enqueue(job)?;
        }
        Ok(jobs)
    }

    /// Sleep until each scheduled time and enqueue the exports, forever
    pub async fn run(&self) -> Result<()> {
        info!(
            hour = self.schedule.hour,
            minute = self.schedule.minute,
            queue = self.queue.name(),
            "Scheduler started"
        );
        loop {
            let now = Utc::now();
            let next = next_run_after(now, self.schedule.hour, self.schedule.minute)?;
            info!(next_run = %next, "Waiting for next export run");

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            let jobs = self.enqueue_exports()?;
            info!(jobs = jobs.len(), "Scheduled exports");
        }
    }
}

//! Job execution and the worker loop

use super::queue::{ClaimedJob, SpoolQueue};
use super::types::{Job, JobKind, WorkerStats};
use crate::config::ExportConfig;
use crate::dataset::DatasetFetcher;
use crate::engine::ExportEngine;
use crate::error::{Error, Result};
use crate::output::push_artifact;
use crate::schema::FlavorRegistry;
use crate::types::Flavor;
use std::time::Duration;
use tracing::{error, info};

/// Everything a job needs to run
#[derive(Debug, Clone)]
pub struct JobContext {
    config: ExportConfig,
    engine: ExportEngine,
}

impl JobContext {
    /// Build the context from config, with a fresh flavor registry
    pub fn new(config: ExportConfig) -> Self {
        let engine = ExportEngine::new(FlavorRegistry::new())
            .with_options(config.conversion.to_options());
        Self { config, engine }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Run one job. Returns the jobs to enqueue after it, `then` excluded.
    pub async fn execute(&self, job: &Job) -> Result<Vec<Job>> {
        match &job.kind {
            JobKind::Export { flavor } => self.export(*flavor).await,
            JobKind::Convert {
                flavor,
                sources,
                output,
            } => {
                let engine = self.engine.clone();
                let (flavor, sources, output) = (*flavor, sources.clone(), output.clone());
                let stats = tokio::task::spawn_blocking(move || {
                    engine.convert(&output, &sources, flavor)
                })
                .await
                .map_err(|e| Error::Other(format!("Conversion task panicked: {e}")))??;
                info!(%flavor, records = stats.records_written, "Conversion job done");
                Ok(Vec::new())
            }
            JobKind::Push { flavor, path } => {
                let spec = self.engine.registry().get(*flavor)?;
                push_artifact(&self.config.push, path, spec.push_repository).await?;
                Ok(Vec::new())
            }
        }
    }

    /// Download the dump, then chain conversion and push
    async fn export(&self, flavor: Flavor) -> Result<Vec<Job>> {
        let spec = self.engine.registry().get(flavor)?;
        let dump_dir = self.config.dataset_dir.join(flavor.code());

        let fetcher = DatasetFetcher::new(&self.config.download)?;
        let sources = fetcher.fetch(flavor, &dump_dir).await?;

        let output = self.config.output_path(spec.output_file_name);
        let push = Job::new(JobKind::Push {
            flavor,
            path: output.clone(),
        });
        let convert = Job::new(JobKind::Convert {
            flavor,
            sources,
            output,
        })
        .then(push);

        Ok(vec![convert])
    }
}

/// Pulls jobs from queues in priority order and runs them one at a time
#[derive(Debug)]
pub struct Worker {
    queues: Vec<SpoolQueue>,
    context: JobContext,
    poll_interval: Duration,
}

impl Worker {
    /// Create a worker over `queues`, highest priority first
    pub fn new(queues: Vec<SpoolQueue>, context: JobContext) -> Self {
        let poll_interval = Duration::from_millis(context.config().worker.poll_interval_ms);
        Self {
            queues,
            context,
            poll_interval,
        }
    }

    /// Process jobs until the queues are empty (burst) or forever
    pub async fn run(&self, burst: bool) -> Result<WorkerStats> {
        let names: Vec<&str> = self.queues.iter().map(SpoolQueue::name).collect();
        info!(queues = ?names, burst, "Worker started");

        let mut stats = WorkerStats::default();
        loop {
            if self.work_once(&mut stats).await? {
                continue;
            }
            if burst {
                info!(
                    succeeded = stats.succeeded,
                    failed = stats.failed,
                    "Queues empty, worker exiting"
                );
                return Ok(stats);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Run the next job from the highest priority non-empty queue.
    /// Returns false when every queue is empty.
    pub async fn work_once(&self, stats: &mut WorkerStats) -> Result<bool> {
        for queue in &self.queues {
            if let Some(claimed) = queue.claim()? {
                self.process(queue, claimed, stats).await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn process(
        &self,
        queue: &SpoolQueue,
        claimed: ClaimedJob,
        stats: &mut WorkerStats,
    ) -> Result<()> {
        let job = claimed.job.clone();
        info!(queue = queue.name(), job = %job.id, task = %job.describe(), "Running job");

        match self.context.execute(&job).await {
            Ok(follow_ups) => {
                for next in follow_ups.iter().chain(job.then.as_deref()) {
                    queue.enqueue(next)?;
                }
                queue.complete(claimed)?;
                stats.succeeded += 1;
            }
            Err(e) => {
                error!(
                    queue = queue.name(),
                    job = %job.id,
                    task = %job.describe(),
                    error = %e,
                    "Job failed"
                );
                queue.fail(claimed)?;
                stats.failed += 1;
            }
        }
        Ok(())
    }
}

//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ExportConfig;
use crate::engine::ExportEngine;
use crate::error::{Error, Result};
use crate::output::push_artifact;
use crate::schema::FlavorRegistry;
use crate::source::SourcePaths;
use crate::tasks::{Job, JobContext, JobKind, Scheduler, SpoolQueue, Worker, HIGH_QUEUE};
use crate::types::Flavor;
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = ExportConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::RunScheduler => self.run_scheduler(config).await,
            Commands::RunWorker { queues, burst } => self.run_worker(config, queues, *burst).await,
            Commands::LaunchExport { flavor } => self.launch_export(&config, *flavor),
            Commands::Convert {
                flavor,
                sources,
                proofs,
                locations,
                output,
                push,
            } => {
                let sources =
                    source_paths(*flavor, sources, proofs.as_deref(), locations.as_deref())?;
                self.convert(config, *flavor, sources, output.clone(), *push)
                    .await
            }
        }
    }

    async fn run_scheduler(&self, config: ExportConfig) -> Result<()> {
        let queue = SpoolQueue::open(&config.spool_dir, HIGH_QUEUE)?;
        let scheduler = Scheduler::new(queue, config.schedule);

        tokio::select! {
            result = scheduler.run() => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Scheduler stopped");
                Ok(())
            }
        }
    }

    async fn run_worker(&self, config: ExportConfig, queues: &[String], burst: bool) -> Result<()> {
        let queues = queues
            .iter()
            .map(|name| SpoolQueue::open(&config.spool_dir, name))
            .collect::<Result<Vec<_>>>()?;
        let worker = Worker::new(queues, JobContext::new(config));

        tokio::select! {
            result = worker.run(burst) => result.map(|_| ()),
            _ = tokio::signal::ctrl_c() => {
                info!("Worker stopped");
                Ok(())
            }
        }
    }

    fn launch_export(&self, config: &ExportConfig, flavor: Flavor) -> Result<()> {
        let queue = SpoolQueue::open(&config.spool_dir, HIGH_QUEUE)?;
        let job = Job::new(JobKind::Export { flavor });
        queue.enqueue(&job)?;
        println!("{}", job.id);
        Ok(())
    }

    async fn convert(
        &self,
        config: ExportConfig,
        flavor: Flavor,
        sources: SourcePaths,
        output: Option<PathBuf>,
        push: bool,
    ) -> Result<()> {
        let engine = ExportEngine::new(FlavorRegistry::new())
            .with_options(config.conversion.to_options());
        let spec = engine.registry().get(flavor)?;
        let output = output.unwrap_or_else(|| config.output_path(spec.output_file_name));
        let repository = spec.push_repository;

        let target = output.clone();
        let stats = tokio::task::spawn_blocking(move || engine.convert(&target, &sources, flavor))
            .await
            .map_err(|e| Error::Other(format!("Conversion task panicked: {e}")))??;

        println!("{}", serde_json::to_string(&stats)?);

        if push {
            push_artifact(&config.push, &output, repository).await?;
        }
        Ok(())
    }
}

/// Arrange positional sources for the flavor
fn source_paths(
    flavor: Flavor,
    sources: &[PathBuf],
    proofs: Option<&Path>,
    locations: Option<&Path>,
) -> Result<SourcePaths> {
    if flavor.is_product() {
        return Ok(SourcePaths::Products {
            paths: sources.to_vec(),
        });
    }

    match (sources, proofs, locations) {
        ([prices], Some(proofs), Some(locations)) => {
            Ok(SourcePaths::prices(prices, proofs, locations))
        }
        _ => Err(Error::config(
            "The price flavor takes one price dump plus --proofs and --locations",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_run_worker_defaults() {
        let cli = Cli::parse_from(["off-exports", "run-worker", "--burst"]);
        match cli.command {
            Commands::RunWorker { queues, burst } => {
                assert_eq!(queues, vec!["off-exports-high", "off-exports-low"]);
                assert!(burst);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_launch_export_alias() {
        let cli = Cli::parse_from(["off-exports", "launch-export", "opff"]);
        assert!(matches!(
            cli.command,
            Commands::LaunchExport {
                flavor: Flavor::PetFood
            }
        ));
    }

    #[test]
    fn test_price_sources_need_lookups() {
        let prices = vec![PathBuf::from("prices.jsonl.gz")];
        assert!(source_paths(Flavor::Price, &prices, None, None).is_err());

        let sources = source_paths(
            Flavor::Price,
            &prices,
            Some(Path::new("proofs.jsonl.gz")),
            Some(Path::new("locations.jsonl.gz")),
        )
        .unwrap();
        assert_eq!(sources.files().len(), 3);

        let sources = source_paths(Flavor::Food, &prices, None, None).unwrap();
        assert_eq!(sources, SourcePaths::product("prices.jsonl.gz"));
    }
}

//! Tests for task queue module

use super::*;
use crate::config::ExportConfig;
use crate::source::SourcePaths;
use crate::types::Flavor;
use chrono::{TimeZone, Utc};
use std::path::Path;
use tempfile::tempdir;

fn context(dataset_dir: &Path) -> JobContext {
    let mut config = ExportConfig::default();
    config.dataset_dir = dataset_dir.to_path_buf();
    config.worker.poll_interval_ms = 10;
    JobContext::new(config)
}

fn convert_job(source: &Path, output: &Path) -> Job {
    Job::new(JobKind::Convert {
        flavor: Flavor::Beauty,
        sources: SourcePaths::product(source),
        output: output.to_path_buf(),
    })
}

// ============================================================================
// Spool Queue Tests
// ============================================================================

#[test]
fn test_claim_in_enqueue_order() {
    let dir = tempdir().unwrap();
    let queue = SpoolQueue::open(dir.path(), HIGH_QUEUE).unwrap();

    let first = Job::new(JobKind::Export {
        flavor: Flavor::Food,
    });
    let second = Job::new(JobKind::Export {
        flavor: Flavor::Price,
    });
    queue.enqueue(&first).unwrap();
    queue.enqueue(&second).unwrap();
    assert_eq!(queue.pending().unwrap().len(), 2);

    let claimed = queue.claim().unwrap().unwrap();
    assert_eq!(claimed.job, first);
    assert_eq!(queue.pending().unwrap(), vec![second.id.clone()]);

    queue.complete(claimed).unwrap();
    let claimed = queue.claim().unwrap().unwrap();
    assert_eq!(claimed.job.id, second.id);
    queue.fail(claimed).unwrap();

    assert!(queue.claim().unwrap().is_none());
    assert_eq!(queue.failed().unwrap(), vec![second.id]);
}

#[test]
fn test_unreadable_job_is_failed() {
    let dir = tempdir().unwrap();
    let queue = SpoolQueue::open(dir.path(), LOW_QUEUE).unwrap();
    std::fs::write(
        dir.path().join(LOW_QUEUE).join("pending").join("broken.json"),
        "{not a job",
    )
    .unwrap();

    assert!(queue.claim().unwrap().is_none());
    assert_eq!(queue.failed().unwrap(), vec!["broken".to_string()]);
}

#[test]
fn test_invalid_queue_name() {
    let dir = tempdir().unwrap();
    assert!(SpoolQueue::open(dir.path(), "").is_err());
    assert!(SpoolQueue::open(dir.path(), "a/b").is_err());
}

#[test]
fn test_job_serde_with_follow_on() {
    let job = Job::new(JobKind::Export {
        flavor: Flavor::PetFood,
    })
    .then(Job::new(JobKind::Push {
        flavor: Flavor::PetFood,
        path: "/data/pet_food.parquet".into(),
    }));

    let json = serde_json::to_value(&job).unwrap();
    assert_eq!(json["kind"]["kind"], "export");
    assert_eq!(json["then"]["kind"]["kind"], "push");

    let back: Job = serde_json::from_value(json).unwrap();
    assert_eq!(back, job);
    assert_eq!(back.describe(), "export pet_food");
}

#[test]
fn test_job_ids_sort_by_creation() {
    let ids: Vec<String> = (0..5)
        .map(|_| {
            Job::new(JobKind::Export {
                flavor: Flavor::Food,
            })
            .id
        })
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

// ============================================================================
// Worker Tests
// ============================================================================

#[tokio::test]
async fn test_worker_runs_follow_on_after_success() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("beauty.jsonl");
    std::fs::write(&source, "{\"code\": \"1\"}\n{\"code\": \"2\"}\n").unwrap();
    let output = dir.path().join("out").join("beauty.parquet");

    let queue = SpoolQueue::open(&dir.path().join("spool"), HIGH_QUEUE).unwrap();
    let push = Job::new(JobKind::Push {
        flavor: Flavor::Beauty,
        path: output.clone(),
    });
    queue
        .enqueue(&convert_job(&source, &output).then(push))
        .unwrap();

    let worker = Worker::new(vec![queue.clone()], context(dir.path()));
    let stats = worker.run(true).await.unwrap();

    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 0);
    assert!(output.exists());
    assert!(queue.pending().unwrap().is_empty());
}

#[tokio::test]
async fn test_worker_failure_drops_follow_on() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("beauty.parquet");

    let queue = SpoolQueue::open(&dir.path().join("spool"), HIGH_QUEUE).unwrap();
    let push = Job::new(JobKind::Push {
        flavor: Flavor::Beauty,
        path: output.clone(),
    });
    let job = convert_job(&dir.path().join("missing.jsonl"), &output).then(push);
    queue.enqueue(&job).unwrap();

    let worker = Worker::new(vec![queue.clone()], context(dir.path()));
    let stats = worker.run(true).await.unwrap();

    assert_eq!(stats, WorkerStats { succeeded: 0, failed: 1 });
    assert_eq!(queue.failed().unwrap(), vec![job.id]);
    assert!(queue.pending().unwrap().is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_worker_prefers_first_queue() {
    let dir = tempdir().unwrap();
    let spool = dir.path().join("spool");
    let high = SpoolQueue::open(&spool, HIGH_QUEUE).unwrap();
    let low = SpoolQueue::open(&spool, LOW_QUEUE).unwrap();

    let source = dir.path().join("beauty.jsonl");
    std::fs::write(&source, "{\"code\": \"1\"}\n").unwrap();
    low.enqueue(&convert_job(&source, &dir.path().join("low.parquet")))
        .unwrap();
    high.enqueue(&convert_job(&source, &dir.path().join("high.parquet")))
        .unwrap();

    let worker = Worker::new(vec![high.clone(), low.clone()], context(dir.path()));
    let mut stats = WorkerStats::default();
    assert!(worker.work_once(&mut stats).await.unwrap());

    assert!(dir.path().join("high.parquet").exists());
    assert!(!dir.path().join("low.parquet").exists());
    assert_eq!(low.pending().unwrap().len(), 1);
}

// ============================================================================
// Scheduler Tests
// ============================================================================

#[test]
fn test_next_run_later_today() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let next = next_run_after(now, 16, 0).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap());
}

#[test]
fn test_next_run_tomorrow_when_passed_or_now() {
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 16, 0, 0).unwrap();
    let next = next_run_after(now, 16, 0).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2025, 1, 1, 16, 0, 0).unwrap());
}

#[test]
fn test_next_run_invalid_time() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    assert!(next_run_after(now, 25, 0).is_err());
}

#[test]
fn test_scheduler_enqueues_every_flavor() {
    let dir = tempdir().unwrap();
    let queue = SpoolQueue::open(dir.path(), HIGH_QUEUE).unwrap();
    let scheduler = Scheduler::new(queue.clone(), crate::config::ScheduleConfig::default());

    let jobs = scheduler.enqueue_exports().unwrap();
    assert_eq!(jobs.len(), Flavor::ALL.len());
    assert_eq!(queue.pending().unwrap().len(), Flavor::ALL.len());

    let first = queue.claim().unwrap().unwrap();
    assert_eq!(
        first.job.kind,
        JobKind::Export {
            flavor: Flavor::Food
        }
    );
}

//! Task queue module
//!
//! A file-spooled job queue with the export jobs run on it.
//!
//! # Overview
//!
//! - `SpoolQueue` - one directory per queue, jobs claimed by atomic rename
//! - `Worker` - runs jobs in queue priority order, chaining follow-ons
//! - `Scheduler` - enqueues an export per flavor once a day
//!
//! An export job downloads the flavor's dump and enqueues a conversion job,
//! which carries the push job as its follow-on.

mod queue;
mod scheduler;
mod types;
mod worker;

pub use queue::{ClaimedJob, SpoolQueue};
pub use scheduler::{next_run_after, Scheduler};
pub use types::{Job, JobKind, WorkerStats, DEFAULT_QUEUES, HIGH_QUEUE, LOW_QUEUE};
pub use worker::{JobContext, Worker};

#[cfg(test)]
mod tests;

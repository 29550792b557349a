//! The delayed-execution queue behind the sync producer.
//!
//! The trait keeps retry/backoff policy testable without a real scheduler;
//! the SQLite implementation makes jobs survive restarts.

use crate::Result as SyncResult;

use idhub_core::SyncJob;
use idhub_db::SyncJobRepository;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job to run after `delay`. Returns false when a job with the
    /// same id is already queued.
    async fn enqueue(&self, job: SyncJob, delay: Duration) -> SyncResult<bool>;

    /// Jobs whose run time has passed.
    async fn due_jobs(&self, now: DateTime<Utc>) -> SyncResult<Vec<SyncJob>>;

    /// Remove a delivered or terminally failed job.
    async fn complete(&self, job_id: &str) -> SyncResult<()>;

    /// Keep a failed job, bumping its attempt count and pushing its run time
    /// out by `delay`.
    async fn retry_later(&self, job: &SyncJob, delay: Duration) -> SyncResult<()>;
}

pub struct SqliteJobQueue {
    repo: SyncJobRepository,
    batch_limit: i64,
}

impl SqliteJobQueue {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: SyncJobRepository::new(pool),
            batch_limit: 50,
        }
    }
}

#[async_trait]
impl JobQueue for SqliteJobQueue {
    async fn enqueue(&self, mut job: SyncJob, delay: Duration) -> SyncResult<bool> {
        job.run_at = Utc::now() + chrono::Duration::from_std(delay).unwrap_or_default();
        Ok(self.repo.insert(&job).await?)
    }

    async fn due_jobs(&self, now: DateTime<Utc>) -> SyncResult<Vec<SyncJob>> {
        Ok(self.repo.due_jobs(now, self.batch_limit).await?)
    }

    async fn complete(&self, job_id: &str) -> SyncResult<()> {
        Ok(self.repo.delete(job_id).await?)
    }

    async fn retry_later(&self, job: &SyncJob, delay: Duration) -> SyncResult<()> {
        let run_at = Utc::now() + chrono::Duration::from_std(delay).unwrap_or_default();
        Ok(self
            .repo
            .reschedule(&job.job_id, job.attempt, run_at)
            .await?)
    }
}

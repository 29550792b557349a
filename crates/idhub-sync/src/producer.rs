//! Outbound sync on a brand node: schedule-on-change, durable delivery with
//! bounded retries, and full backfill.

use crate::gateway::{FailureNotifier, HubGateway};
use crate::job_queue::JobQueue;
use crate::Result as SyncResult;

use idhub_config::SyncConfig;
use idhub_core::{LocalUser, SyncAction, SyncJob, SyncStatus, UserRecord};
use idhub_db::SyncStatusRepository;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use idhub_db::LocalUserRepository;
use log::{debug, info, warn};

/// Source of the whole local user set for backfill. A trait so the producer
/// is testable without a database.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn count(&self) -> SyncResult<i64>;
    async fn page(&self, offset: i64, limit: i64) -> SyncResult<Vec<LocalUser>>;
}

#[async_trait]
impl UserDirectory for LocalUserRepository {
    async fn count(&self) -> SyncResult<i64> {
        Ok(LocalUserRepository::count(self).await?)
    }

    async fn page(&self, offset: i64, limit: i64) -> SyncResult<Vec<LocalUser>> {
        Ok(LocalUserRepository::page(self, offset, limit).await?)
    }
}

/// Outcome of a full backfill. A failed page never aborts later pages, so
/// the report can carry both progress and errors.
#[derive(Debug, Default)]
pub struct BackfillReport {
    pub pages_sent: usize,
    pub users_sent: u64,
    pub page_errors: Vec<(usize, String)>,
}

impl BackfillReport {
    pub fn is_partial(&self) -> bool {
        !self.page_errors.is_empty()
    }
}

pub struct SyncProducer {
    queue: Arc<dyn JobQueue>,
    hub: Arc<dyn HubGateway>,
    status: SyncStatusRepository,
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn FailureNotifier>,
    config: SyncConfig,
    site_name: String,
    site_url: String,
}

impl SyncProducer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn JobQueue>,
        hub: Arc<dyn HubGateway>,
        status: SyncStatusRepository,
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn FailureNotifier>,
        config: SyncConfig,
        site_name: &str,
        site_url: &str,
    ) -> Self {
        Self {
            queue,
            hub,
            status,
            directory,
            notifier,
            config,
            site_name: site_name.to_string(),
            site_url: site_url.to_string(),
        }
    }

    /// A new local account: schedule a create delivery unless the user's
    /// marker says a sync is already underway or settled.
    pub async fn on_user_created(&self, user: &LocalUser) -> SyncResult<bool> {
        self.schedule_if_unsynced(user, SyncAction::Create).await
    }

    /// A profile change. Only an email change is significant; anything else
    /// schedules nothing.
    pub async fn on_user_changed(&self, user: &LocalUser, old: &LocalUser) -> SyncResult<bool> {
        if user.email == old.email {
            debug!("No significant change for user {}, skipping sync", user.id);
            return Ok(false);
        }
        self.schedule_if_unsynced(user, SyncAction::Update).await
    }

    async fn schedule_if_unsynced(&self, user: &LocalUser, action: SyncAction) -> SyncResult<bool> {
        let user_id = user.id.to_string();
        let marker = self.status.get(&user_id).await?;
        if marker != SyncStatus::Unsynced {
            debug!(
                "Skipping {} sync for user {}: marker is {}",
                action,
                user_id,
                marker.as_str()
            );
            return Ok(false);
        }
        self.schedule(user, action).await
    }

    /// Enqueue one delivery job. The deterministic job id collapses duplicate
    /// calls within the same second; only a job that actually lands flips the
    /// marker to in-progress.
    pub async fn schedule(&self, user: &LocalUser, action: SyncAction) -> SyncResult<bool> {
        let record = UserRecord::from_local_user(user, &self.site_name, &self.site_url, action);
        let job = SyncJob::new(user.id.to_string(), action, record);
        let job_id = job.job_id.clone();

        let enqueued = self.queue.enqueue(job, Duration::ZERO).await?;
        if enqueued {
            self.status
                .set(&user.id.to_string(), SyncStatus::InProgress)
                .await?;
            info!("Scheduled sync job {}", job_id);
        } else {
            debug!("Duplicate sync job {} collapsed", job_id);
        }
        Ok(enqueued)
    }

    /// One delivery attempt. Success is HTTP 200 with `success: true`;
    /// anything else counts against the retry budget. After max_retries the
    /// job is dropped, the user marked failed, and the notifier fired.
    pub async fn deliver(&self, mut job: SyncJob) -> SyncResult<bool> {
        job.attempt += 1;

        let outcome = self.hub.push_users(std::slice::from_ref(&job.payload)).await;
        match outcome {
            Ok(ack) if ack.success => {
                self.queue.complete(&job.job_id).await?;
                self.status.set(&job.user_id, SyncStatus::Synced).await?;
                info!(
                    "Delivered sync job {} on attempt {}",
                    job.job_id, job.attempt
                );
                Ok(true)
            }
            outcome => {
                let message = match outcome {
                    Ok(_) => "governing node answered success=false".to_string(),
                    Err(e) => e.to_string(),
                };

                if job.attempt >= self.config.max_retries {
                    self.queue.complete(&job.job_id).await?;
                    self.status.set(&job.user_id, SyncStatus::Failed).await?;
                    self.notifier
                        .notify_failure(&job.user_id, job.attempt, &message);
                    Ok(false)
                } else {
                    let delay = self.backoff_delay(job.attempt);
                    warn!(
                        "Sync job {} attempt {} failed ({}), retrying in {}s",
                        job.job_id,
                        job.attempt,
                        message,
                        delay.as_secs()
                    );
                    self.queue.retry_later(&job, delay).await?;
                    Ok(false)
                }
            }
        }
    }

    /// min(2^attempt * base, cap), saturating.
    pub fn backoff_delay(&self, attempt: i32) -> Duration {
        let shift = attempt.clamp(0, 32) as u32;
        let scaled = self
            .config
            .backoff_base_secs
            .saturating_mul(1u64.checked_shl(shift).unwrap_or(u64::MAX));
        Duration::from_secs(scaled.min(self.config.backoff_cap_secs))
    }

    /// Push every local user to the governing node in fixed-size batches.
    /// One failed batch is recorded and the walk continues; the report says
    /// whether the backfill was partial.
    pub async fn send_all_users_for_deduplication(&self) -> SyncResult<BackfillReport> {
        let total = self.directory.count().await?;
        let batch = self.config.batch_size as i64;
        let mut report = BackfillReport::default();

        let mut offset = 0i64;
        let mut page_index = 0usize;
        while offset < total {
            let users = self.directory.page(offset, batch).await?;
            if users.is_empty() {
                break;
            }

            let records: Vec<UserRecord> = users
                .iter()
                .map(|u| {
                    UserRecord::from_local_user(u, &self.site_name, &self.site_url, SyncAction::Create)
                })
                .collect();

            match self.hub.push_users(&records).await {
                Ok(ack) if ack.success => {
                    report.pages_sent += 1;
                    report.users_sent += records.len() as u64;
                }
                Ok(_) => {
                    report
                        .page_errors
                        .push((page_index, "governing node answered success=false".to_string()));
                }
                Err(e) => {
                    warn!("Backfill page {} failed: {}", page_index, e);
                    report.page_errors.push((page_index, e.to_string()));
                }
            }

            offset += batch;
            page_index += 1;
        }

        info!(
            "Backfill finished: {} pages, {} users, {} failed pages",
            report.pages_sent,
            report.users_sent,
            report.page_errors.len()
        );
        Ok(report)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.poll_interval_secs)
    }
}

//! Polling loop that drives due sync jobs through delivery.

use crate::job_queue::JobQueue;
use crate::producer::SyncProducer;
use crate::Result as SyncResult;

use std::sync::Arc;

use chrono::Utc;
use log::{debug, error};

pub struct SyncWorker {
    queue: Arc<dyn JobQueue>,
    producer: Arc<SyncProducer>,
}

impl SyncWorker {
    pub fn new(queue: Arc<dyn JobQueue>, producer: Arc<SyncProducer>) -> Self {
        Self { queue, producer }
    }

    /// One poll: deliver every due job. Delivery failures are already
    /// absorbed into retry state by the producer; only infrastructure errors
    /// surface here.
    pub async fn tick(&self) -> SyncResult<usize> {
        let due = self.queue.due_jobs(Utc::now()).await?;
        let count = due.len();
        if count > 0 {
            debug!("Processing {} due sync jobs", count);
        }

        for job in due {
            if let Err(e) = self.producer.deliver(job).await {
                error!("Sync delivery errored: {}", e);
            }
        }

        Ok(count)
    }

    /// Poll until the task is dropped or aborted.
    pub async fn run(self) {
        let interval = self.producer.poll_interval();
        loop {
            if let Err(e) = self.tick().await {
                error!("Sync worker poll failed: {}", e);
            }
            tokio::time::sleep(interval).await;
        }
    }
}

use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BACKOFF_BASE_SECS, DEFAULT_BACKOFF_CAP_SECS,
    DEFAULT_BATCH_SIZE, DEFAULT_DELIVERY_TIMEOUT_SECS, DEFAULT_MAX_RETRIES,
    DEFAULT_POLL_INTERVAL_SECS,
};

use serde::Deserialize;

/// Sync producer policy (brand nodes).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Delivery attempts before a job is marked terminally failed
    pub max_retries: i32,
    /// Users per batch during full backfill
    pub batch_size: usize,
    /// Per-delivery HTTP timeout
    pub delivery_timeout_secs: u64,
    /// Backoff is min(2^attempt * base, cap)
    pub backoff_base_secs: u64,
    pub backoff_cap_secs: u64,
    /// Worker poll interval for due jobs
    pub poll_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            batch_size: DEFAULT_BATCH_SIZE,
            delivery_timeout_secs: DEFAULT_DELIVERY_TIMEOUT_SECS,
            backoff_base_secs: DEFAULT_BACKOFF_BASE_SECS,
            backoff_cap_secs: DEFAULT_BACKOFF_CAP_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_retries < 1 {
            return Err(ConfigError::sync(format!(
                "sync.max_retries must be >= 1, got {}",
                self.max_retries
            )));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::sync("sync.batch_size must be >= 1"));
        }
        if self.delivery_timeout_secs == 0 {
            return Err(ConfigError::sync("sync.delivery_timeout_secs must be >= 1"));
        }
        if self.backoff_base_secs == 0 {
            return Err(ConfigError::sync("sync.backoff_base_secs must be >= 1"));
        }
        if self.backoff_cap_secs < self.backoff_base_secs {
            return Err(ConfigError::sync(
                "sync.backoff_cap_secs must be >= sync.backoff_base_secs",
            ));
        }
        Ok(())
    }
}

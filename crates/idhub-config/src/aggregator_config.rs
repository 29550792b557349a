use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_PAGES_PER_NODE,
    DEFAULT_OVERALL_TIMEOUT_SECS, DEFAULT_PAGE_SIZE, DEFAULT_PER_NODE_TIMEOUT_SECS,
};

use serde::Deserialize;

/// Request aggregator policy (governing nodes).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Fixed page size of the merged, globally-ordered result
    pub page_size: i64,
    /// Timeout for each remote node's full drain
    pub per_node_timeout_secs: u64,
    /// Overall budget for one aggregated query; partial results past this
    pub overall_timeout_secs: u64,
    /// TTL of the merged-and-sorted cache; invalidated on every write
    pub cache_ttl_secs: u64,
    /// Guard against remote nodes that never report has_more=false
    pub max_pages_per_node: u32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            per_node_timeout_secs: DEFAULT_PER_NODE_TIMEOUT_SECS,
            overall_timeout_secs: DEFAULT_OVERALL_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_pages_per_node: DEFAULT_MAX_PAGES_PER_NODE,
        }
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.page_size < 1 {
            return Err(ConfigError::aggregator(format!(
                "aggregator.page_size must be >= 1, got {}",
                self.page_size
            )));
        }
        if self.per_node_timeout_secs == 0 || self.overall_timeout_secs == 0 {
            return Err(ConfigError::aggregator(
                "aggregator timeouts must be >= 1 second",
            ));
        }
        if self.max_pages_per_node == 0 {
            return Err(ConfigError::aggregator(
                "aggregator.max_pages_per_node must be >= 1",
            ));
        }
        Ok(())
    }
}

pub mod aggregator_config;
pub mod config;
pub mod database_config;
pub mod error;
pub mod log_level;
pub mod logging_config;
pub mod node_config;
pub mod server_config;
pub mod sync_config;


pub use aggregator_config::AggregatorConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, Result as ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use node_config::{NodeConfig, NodeRole};
pub use server_config::ServerConfig;
pub use sync_config::SyncConfig;

// Server defaults
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8710;
pub const MIN_PORT: u16 = 1024;

// Logging defaults
pub const DEFAULT_LOG_LEVEL_STRING: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

// Sync producer defaults
pub const DEFAULT_MAX_RETRIES: i32 = 5;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BACKOFF_BASE_SECS: u64 = 60;
pub const DEFAULT_BACKOFF_CAP_SECS: u64 = 3600;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

// Aggregator defaults
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const DEFAULT_PER_NODE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OVERALL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15;
pub const DEFAULT_MAX_PAGES_PER_NODE: u32 = 500;

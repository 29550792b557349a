use crate::{
    AggregatorConfig, ConfigError, ConfigErrorResult, DatabaseConfig, LoggingConfig, NodeConfig,
    NodeRole, ServerConfig, SyncConfig,
};

use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub node: NodeConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
    pub aggregator: AggregatorConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for IDHUB_CONFIG_DIR env var, else use ./.idhub/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply IDHUB_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: IDHUB_CONFIG_DIR env var > ./.idhub/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("IDHUB_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".idhub"))
    }

    /// Apply IDHUB_* environment variable overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("IDHUB_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("IDHUB_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!("Ignoring invalid IDHUB_PORT: {}", port),
            }
        }
        if let Ok(role) = std::env::var("IDHUB_ROLE") {
            match NodeRole::from_str(&role) {
                Ok(r) => self.node.role = r,
                Err(_) => warn!("Ignoring invalid IDHUB_ROLE: {}", role),
            }
        }
        if let Ok(name) = std::env::var("IDHUB_SITE_NAME") {
            self.node.site_name = name;
        }
        if let Ok(url) = std::env::var("IDHUB_SITE_URL") {
            self.node.site_url = url;
        }
        if let Ok(secret) = std::env::var("IDHUB_SHARED_SECRET") {
            self.node.shared_secret = Some(secret);
        }
        if let Ok(hub) = std::env::var("IDHUB_HUB_URL") {
            self.node.hub_url = Some(hub);
        }
        if let Ok(level) = std::env::var("IDHUB_LOG_LEVEL") {
            // FromStr never fails; invalid values fall back to Info
            self.logging.level = crate::LogLevel::from_str(&level).unwrap();
        }
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.node.validate()?;
        self.server.validate()?;
        self.sync.validate()?;
        self.aggregator.validate()?;

        // Validate database path doesn't escape config dir
        let db_path = std::path::Path::new(&self.database.path);
        if db_path.is_absolute() || self.database.path.contains("..") {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log a startup summary of the effective configuration.
    pub fn log_summary(&self) {
        info!(
            "Node: role={}, site={} ({})",
            self.node.role.as_str(),
            self.node.site_name,
            self.node.site_url
        );
        info!("Server: {}", self.bind_addr());
        info!(
            "Sync: max_retries={}, batch_size={}, backoff={}s..{}s",
            self.sync.max_retries,
            self.sync.batch_size,
            self.sync.backoff_base_secs,
            self.sync.backoff_cap_secs
        );
        if self.node.role == NodeRole::Governing {
            info!(
                "Aggregator: page_size={}, per_node_timeout={}s, cache_ttl={}s",
                self.aggregator.page_size,
                self.aggregator.per_node_timeout_secs,
                self.aggregator.cache_ttl_secs
            );
        }
    }
}

use crate::{DEFAULT_LOG_DIR, LogLevel};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Log file name; None = stdout
    pub file: Option<String>,
    /// Directory (under the config dir) for log files
    pub dir: String,
    /// Colored output for TTYs (ignored for file output)
    pub colored: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            file: None,
            dir: String::from(DEFAULT_LOG_DIR),
            colored: true,
        }
    }
}

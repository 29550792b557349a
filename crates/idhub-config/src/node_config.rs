//! Which node this process is, and the credentials it carries.
//!
//! The node identity is explicit injected configuration: every component that
//! needs to know whether it runs on a brand or governing node receives it as
//! a value, never reads a global.

use crate::{ConfigError, ConfigErrorResult};

use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Holds authoritative local user accounts and change requests.
    Brand,
    /// Aggregates identities and requests, issues approve/reject decisions.
    Governing,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Brand => "brand",
            NodeRole::Governing => "governing",
        }
    }
}

impl FromStr for NodeRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brand" => Ok(NodeRole::Brand),
            "governing" => Ok(NodeRole::Governing),
            other => Err(ConfigError::node(format!(
                "node.role must be 'brand' or 'governing', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub role: NodeRole,
    /// Display name this node reports for itself
    pub site_name: String,
    /// This node's own public URL (sent as Origin/User-Agent on outbound calls)
    pub site_url: String,
    /// Brand nodes: the secret issued by the governing node at registration
    pub shared_secret: Option<String>,
    /// Brand nodes: base URL of the governing node
    pub hub_url: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            role: NodeRole::Brand,
            site_name: String::new(),
            site_url: String::new(),
            shared_secret: None,
            hub_url: None,
        }
    }
}

impl NodeConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.site_url.is_empty() {
            return Err(ConfigError::node("node.site_url is required"));
        }

        if self.role == NodeRole::Brand {
            if self.shared_secret.as_deref().unwrap_or("").is_empty() {
                return Err(ConfigError::node(
                    "node.shared_secret is required on brand nodes",
                ));
            }
            if self.hub_url.as_deref().unwrap_or("").is_empty() {
                return Err(ConfigError::node("node.hub_url is required on brand nodes"));
            }
        }

        Ok(())
    }
}

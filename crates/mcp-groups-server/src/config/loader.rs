//! TOML configuration for the groups server.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mcp_groups::{Group, Meta, GROUPS_META_KEY};

use crate::types::{McpError, McpResult, NotificationOptions, SERVER_NAME};

/// Server configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name reported in `serverInfo`.
    pub server_name: String,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log a warning when a group name is registered twice.
    pub warn_on_duplicate_groups: bool,
    /// Instructions returned from `initialize`.
    pub instructions: Option<String>,
    /// Which list-changed notifications to offer.
    pub notifications: NotificationOptions,
    /// Group listing and startup groups.
    pub groups: GroupsConfig,
}

/// `[groups]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsConfig {
    /// Install a registry-backed `groups/list` handler.
    pub enabled: bool,
    /// Serve `groups/list` in pages of this size instead of all at once.
    pub page_size: Option<usize>,
    /// Groups registered at startup, in order.
    pub seed: Vec<SeedGroup>,
}

/// A `[[groups.seed]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedGroup {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Written to the group's `_meta` under the groups key, unchecked.
    #[serde(default)]
    pub parents: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: SERVER_NAME.to_string(),
            log_level: "info".to_string(),
            warn_on_duplicate_groups: true,
            instructions: None,
            notifications: NotificationOptions::default(),
            groups: GroupsConfig::default(),
        }
    }
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: None,
            seed: Vec::new(),
        }
    }
}

impl SeedGroup {
    /// Build the group record this entry describes.
    pub fn to_group(&self) -> Group {
        let mut group = Group::new(self.name.clone());
        group.title = self.title.clone();
        group.description = self.description.clone();
        if !self.parents.is_empty() {
            let mut meta = Meta::new();
            let parents = self.parents.iter().cloned().map(Value::String).collect();
            meta.insert(GROUPS_META_KEY.to_string(), Value::Array(parents));
            group.meta = Some(meta);
        }
        group
    }
}

impl ServerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> McpResult<Self> {
        let config: ServerConfig =
            toml::from_str(text).map_err(|e| McpError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> McpResult<()> {
        if self.groups.page_size == Some(0) {
            return Err(McpError::Config(
                "groups.page_size must be at least 1".to_string(),
            ));
        }
        if let Some(seed) = self.groups.seed.iter().find(|s| s.name.trim().is_empty()) {
            return Err(McpError::Config(format!(
                "groups.seed entry has an empty name (title: {:?})",
                seed.title
            )));
        }
        Ok(())
    }
}

/// Load configuration from `path`, or defaults when no path is given.
pub fn load_config(path: Option<&str>) -> McpResult<ServerConfig> {
    let Some(path) = path else {
        return Ok(ServerConfig::default());
    };

    let path = Path::new(path);
    let text = std::fs::read_to_string(path).map_err(|e| {
        McpError::Config(format!("Failed to read config {}: {e}", path.display()))
    })?;
    let config = ServerConfig::from_toml(&text)?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

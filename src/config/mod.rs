//! Configuration loading and management

use crate::core::query::DEFAULT_PAGE_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Listen settings used by [`serve`](crate::server::serve)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind (e.g., "0.0.0.0:9090")
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size applied when a request sends `limit=0` or no limit
    pub default_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Where the `LINK` / `UNLINK` methods are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMethodPlacement {
    /// `LINK` and `UNLINK` on `B/{id}`
    #[default]
    Resource,

    /// `LINK` on `B/{id}/link`, `UNLINK` on `B/{id}/unlink`
    ActionPath,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub link_method_placement: LinkMethodPlacement,
}

/// Complete configuration of a mapped service
///
/// Every section is optional in YAML:
///
/// ```yaml
/// server:
///   addr: "127.0.0.1:8080"
/// pagination:
///   default_limit: 25
/// routes:
///   link_method_placement: action_path
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudConfig {
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub routes: RoutesConfig,
}

impl CrudConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

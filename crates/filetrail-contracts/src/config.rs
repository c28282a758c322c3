//! Runtime configuration, deserialized from TOML.
//!
//! Every field has a default, so an empty document (or no `--config` flag at
//! all) yields a fully usable configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TrailError, TrailResult};

/// Top-level runtime configuration for the daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub maintenance: MaintenanceConfig,
    pub feed: FeedConfig,
}

/// Settings for the bulk-clear maintenance operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Documents fetched and deleted per page. The clear loop terminates
    /// when a fetch returns fewer than this many ids.
    pub page_size: usize,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self { page_size: 500 }
    }
}

/// Settings for the watcher's resubscribe backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Delay before the first resubscribe attempt, in milliseconds.
    pub resubscribe_initial_ms: u64,

    /// Ceiling for the exponential backoff, in milliseconds.
    pub resubscribe_max_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            resubscribe_initial_ms: 200,
            resubscribe_max_ms: 5_000,
        }
    }
}

impl RuntimeConfig {
    /// Parse `s` as TOML runtime configuration.
    ///
    /// Returns `TrailError::Config` if the TOML is malformed or does not
    /// match the expected schema.
    pub fn from_toml_str(s: &str) -> TrailResult<Self> {
        toml::from_str(s).map_err(|e| TrailError::Config {
            reason: format!("failed to parse runtime config TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML runtime configuration.
    pub fn from_file(path: &Path) -> TrailResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TrailError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

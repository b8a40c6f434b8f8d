//! Configuration loading for the CyberScope CLI.

use anyhow::{Context, Result};
use cs_core::graph::{ConnectionLabel, GraphOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Threat-intelligence feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Attack-graph synthesis settings.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Analyst session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Threat-intelligence feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Default feed file path.
    #[serde(default = "default_feed_path")]
    pub path: String,
}

fn default_feed_path() -> String {
    "data/history.json".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: default_feed_path(),
        }
    }
}

/// Attack-graph synthesis settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Edge label for source-IP connections without a VirusTotal verdict.
    #[serde(default)]
    pub default_connection_label: ConnectionLabel,
}

impl GraphConfig {
    pub fn options(&self) -> GraphOptions {
        GraphOptions {
            default_connection_label: self.default_connection_label,
        }
    }
}

/// Analyst session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where the active analyst id is persisted.
    #[serde(default = "default_session_path")]
    pub state_path: String,
}

fn default_session_path() -> String {
    ".cyberscope/analyst".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_path: default_session_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to use JSON format.
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

//! Configuration management for week-planner.
//!
//! Settings live in `config.yaml` inside the data directory. Every field has a
//! default, so a missing file or a partial file is fine.

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Messages endpoint of the hosted language-model API.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Model used for task extraction.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Value of the `anthropic-version` header.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Response token budget for one extraction.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Planner settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Model name sent with every extraction request.
    pub model: String,

    /// Endpoint the extraction request is posted to.
    pub api_url: String,

    /// API version header value.
    pub api_version: String,

    /// Maximum tokens the model may answer with.
    pub max_tokens: u32,

    /// Seconds to wait for the API before giving up.
    pub timeout_secs: u64,

    /// Append planner events to `events.jsonl` in the data directory.
    pub debug_logging: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debug_logging: false,
        }
    }
}

impl PlannerConfig {
    /// Load config from a data directory, returning None if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(data_dir: &Path) -> Result<Option<Self>> {
        let config_path = Self::config_path(data_dir);
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Load config from a data directory, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        Ok(Self::load_from(data_dir)?.unwrap_or_default())
    }

    /// Save config to a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, data_dir: &Path) -> Result<()> {
        let config_path = Self::config_path(data_dir);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the config file path for a data directory.
    #[must_use]
    pub fn config_path(data_dir: &Path) -> PathBuf {
        paths::config_path(data_dir)
    }
}

/// Ensure config exists, writing defaults if not.
///
/// Returns the config (either loaded or newly created).
///
/// # Errors
///
/// Returns an error if config cannot be loaded or saved.
pub fn ensure_config(data_dir: &Path) -> Result<PlannerConfig> {
    if let Some(config) = PlannerConfig::load_from(data_dir)? {
        return Ok(config);
    }

    let config = PlannerConfig::default();
    config.save_to(data_dir)?;
    tracing::info!(path = %PlannerConfig::config_path(data_dir).display(), "wrote default config");
    Ok(config)
}

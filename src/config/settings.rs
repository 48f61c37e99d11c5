// Configuration structs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::constants::*;
use crate::metrics::DEFAULT_RECENT_COMMENTS;

/// Where the two model coefficient files live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// v1 baseline coefficients (JSON)
    pub baseline_path: PathBuf,

    /// v2 improved coefficients (JSON)
    pub improved_path: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            baseline_path: PathBuf::from(DEFAULT_BASELINE_MODEL),
            improved_path: PathBuf::from(DEFAULT_IMPROVED_MODEL),
        }
    }
}

/// Dashboard display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How long a loaded log is reused before re-reading the file
    pub cache_ttl_secs: u64,

    /// Number of comments listed under "Recent Comments"
    pub recent_comments: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            recent_comments: DEFAULT_RECENT_COMMENTS,
        }
    }
}

impl DashboardConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Append-only monitoring table (CSV)
    pub log_path: PathBuf,

    /// Dataset used to populate Region / Sub-Category choices (optional)
    pub reference_csv: PathBuf,

    pub models: ModelsConfig,

    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: default_data_dir().join(DEFAULT_LOG_FILE),
            reference_csv: PathBuf::from(DEFAULT_REFERENCE_CSV),
            models: ModelsConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

/// ~/.salesmon, or ./.salesmon when no home directory is known
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

impl Config {
    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.log_path.as_os_str().is_empty() {
            anyhow::bail!("log_path must not be empty");
        }
        if self.dashboard.recent_comments == 0 {
            anyhow::bail!("dashboard.recent_comments must be at least 1");
        }
        Ok(())
    }
}

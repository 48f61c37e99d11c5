// Configuration loader
// Loads settings from ~/.salesmon/config.toml (or an explicit path) plus
// environment overrides; falls back to defaults when no file exists

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::constants::{CONFIG_FILE_NAME, LOG_PATH_ENV};
use super::settings::{default_data_dir, Config};

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default config file is
/// used if present, otherwise built-in defaults. `SALESMON_LOG_PATH`
/// overrides the log location in every case.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            load_from_file(path)?
        }
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                load_from_file(&default_path)?
            } else {
                debug!(path = %default_path.display(), "No config file; using defaults");
                Config::default()
            }
        }
    };

    apply_log_path_override(&mut config, std::env::var(LOG_PATH_ENV).ok());

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// ~/.salesmon/config.toml
pub fn default_config_path() -> PathBuf {
    default_data_dir().join(CONFIG_FILE_NAME)
}

fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    let config = parse_config(&contents)
        .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Parse TOML; every key is optional
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Empty values are ignored
pub fn apply_log_path_override(config: &mut Config, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        config.log_path = PathBuf::from(value);
    }
}

// Project-wide constants
//
// Centralised here so file names and other magic values have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Directory under $HOME holding config and the default log
pub const DATA_DIR_NAME: &str = ".salesmon";

/// Config file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default monitoring log file name
pub const DEFAULT_LOG_FILE: &str = "monitoring_logs.csv";

/// Environment variable overriding the monitoring log path
pub const LOG_PATH_ENV: &str = "SALESMON_LOG_PATH";

/// Dataset the reference categories come from (relative to the working dir)
pub const DEFAULT_REFERENCE_CSV: &str = "sales.csv";

/// Baseline (Row ID only) model coefficients
pub const DEFAULT_BASELINE_MODEL: &str = "revenue_model_v1.json";

/// Improved (Row ID + Region + Sub-Category) model coefficients
pub const DEFAULT_IMPROVED_MODEL: &str = "revenue_model_v2.json";

/// Seconds a loaded log is reused by the dashboard
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5;

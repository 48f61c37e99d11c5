// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
mod settings;

pub use loader::{apply_log_path_override, default_config_path, load_config, parse_config};
pub use settings::{default_data_dir, Config, DashboardConfig, ModelsConfig};

// CLI module
// Public interface for command-line interface

mod commands;
mod dashboard;

pub use commands::{handle_command, watch_dashboard, Command};
pub use dashboard::{
    format_currency, format_timestamp, render_dashboard, EMPTY_STATE_MESSAGE,
};

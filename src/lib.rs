// Salesmon - prediction + feedback monitoring for two sales models
// Library exports

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod session;

pub use errors::MonitorError;

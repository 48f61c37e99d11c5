// Prediction + feedback logging
//
// Every event becomes one CSV row in an append-only table that the
// dashboard reads back in full.

pub mod prediction_logger;
pub mod record;

pub use prediction_logger::PredictionLogger;
pub use record::{Record, COLUMNS};

// Domain errors surfaced to the user
//
// I/O and parse failures travel as anyhow::Error with context; these are the
// cases callers are expected to match on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Prediction value is NaN, infinite, or not a number at all
    #[error("prediction must be numeric, got {0}")]
    NonNumericPrediction(String),

    /// Latency is NaN or infinite
    #[error("latency must be a finite number of milliseconds, got {0}")]
    NonNumericLatency(String),

    /// Feedback score outside the 1-5 scale
    #[error("feedback score must be between 1 and 5, got {0}")]
    InvalidFeedbackScore(i64),

    /// Feedback submitted before any prediction ran in this session
    #[error("Please run the prediction first, then submit your feedback.")]
    NoPrediction,

    /// Existing log header lacks columns a record needs; nothing was appended
    #[error("monitoring log header is missing columns: {0}")]
    IncompatibleLogHeader(String),

    /// Model file could not be loaded
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_prediction_message_is_user_facing() {
        let msg = MonitorError::NoPrediction.to_string();
        assert!(msg.contains("run the prediction first"));
    }

    #[test]
    fn test_invalid_score_message() {
        let msg = MonitorError::InvalidFeedbackScore(9).to_string();
        assert_eq!(msg, "feedback score must be between 1 and 5, got 9");
    }
}

// One row of the monitoring log, as written

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::MonitorError;

/// Column order of the persisted table. Never reorder: existing files
/// keep the header they were created with.
pub const COLUMNS: [&str; 8] = [
    "timestamp",
    "model_version",
    "model_type",
    "input_summary",
    "prediction",
    "latency_ms",
    "feedback_score",
    "feedback_text",
];

/// A single prediction + feedback event
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Set at construction time (UTC)
    pub timestamp: DateTime<Utc>,

    /// Model identifier, e.g. "v1" / "v2"
    pub model_version: String,

    /// Free-form label ("baseline", "improved")
    pub model_type: String,

    /// Human-readable echo of the request inputs
    pub input_summary: String,

    pub prediction: f64,

    /// None is stored as an empty cell, never as zero
    pub latency_ms: Option<f64>,

    /// 1-5 when present
    pub feedback_score: Option<u8>,

    /// Empty string when the user left no comment
    pub feedback_text: String,
}

impl Record {
    /// Build a record stamped with the current time.
    ///
    /// Rejects non-finite predictions or latencies and scores outside 1-5; a missing
    /// comment becomes an empty string.
    pub fn new(
        model_version: &str,
        model_type: &str,
        input_summary: &str,
        prediction: f64,
        latency_ms: Option<f64>,
        feedback_score: Option<i64>,
        feedback_text: Option<&str>,
    ) -> Result<Self, MonitorError> {
        if !prediction.is_finite() {
            return Err(MonitorError::NonNumericPrediction(prediction.to_string()));
        }

        if let Some(latency) = latency_ms.filter(|l| !l.is_finite()) {
            return Err(MonitorError::NonNumericLatency(latency.to_string()));
        }

        let feedback_score = match feedback_score {
            Some(score) if (1..=5).contains(&score) => Some(score as u8),
            Some(score) => return Err(MonitorError::InvalidFeedbackScore(score)),
            None => None,
        };

        Ok(Self {
            timestamp: Utc::now(),
            model_version: model_version.to_string(),
            model_type: model_type.to_string(),
            input_summary: input_summary.to_string(),
            prediction,
            latency_ms,
            feedback_score,
            feedback_text: feedback_text.unwrap_or_default().to_string(),
        })
    }

    /// Coerce a textual prediction to a float
    pub fn parse_prediction(raw: &str) -> Result<f64, MonitorError> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| MonitorError::NonNumericPrediction(raw.to_string()))
    }

    /// Cells in `COLUMNS` order
    pub fn to_row(&self) -> [String; 8] {
        [
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.model_version.clone(),
            self.model_type.clone(),
            self.input_summary.clone(),
            self.prediction.to_string(),
            self.latency_ms.map(|l| l.to_string()).unwrap_or_default(),
            self.feedback_score.map(|s| s.to_string()).unwrap_or_default(),
            self.feedback_text.clone(),
        ]
    }

    /// Cells laid out under an existing header, matched by column name.
    /// Columns unknown to this record are left empty; a header missing any
    /// of `COLUMNS` is refused rather than dropping values.
    pub fn to_row_for<'h, I>(&self, header: I) -> Result<Vec<String>, MonitorError>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let header: Vec<&str> = header.into_iter().map(str::trim).collect();

        let missing: Vec<&str> = COLUMNS
            .iter()
            .copied()
            .filter(|column| !header.contains(column))
            .collect();
        if !missing.is_empty() {
            return Err(MonitorError::IncompatibleLogHeader(missing.join(", ")));
        }

        let mut cells = self.to_row().map(Some);
        Ok(header
            .iter()
            .map(|name| {
                COLUMNS
                    .iter()
                    .position(|column| column == name)
                    .and_then(|i| cells[i].take())
                    .unwrap_or_default()
            })
            .collect())
    }
}

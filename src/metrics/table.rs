// Loading the monitoring table back for reporting

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// A row as read back from disk. Anything that may be missing from a
/// partially-written or hand-edited table is optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedRow {
    pub timestamp: Option<DateTime<Utc>>,
    pub model_version: Option<String>,
    pub model_type: String,
    pub input_summary: String,
    pub prediction: Option<f64>,
    pub latency_ms: Option<f64>,
    pub feedback_score: Option<i64>,
    pub feedback_text: String,
}

/// Result of loading the table
#[derive(Debug, Clone, PartialEq)]
pub enum LogTable {
    /// No log file yet, or a file without any data rows
    Empty,
    /// Rows sorted ascending by timestamp, unparsable timestamps last
    Loaded(Vec<LoggedRow>),
}

impl LogTable {
    /// Read the whole table fresh from disk
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No monitoring log yet");
                return Ok(LogTable::Empty);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open monitoring log: {}", path.display()))
            }
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read log header: {}", path.display()))?
            .clone();
        let columns = ColumnIndex::from_headers(&headers);

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("Failed to parse monitoring log row {} in {}", line + 1, path.display())
            })?;
            rows.push(columns.normalize(&record));
        }

        if rows.is_empty() {
            return Ok(LogTable::Empty);
        }

        sort_by_timestamp(&mut rows);
        Ok(LogTable::Loaded(rows))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LogTable::Empty => true,
            LogTable::Loaded(rows) => rows.is_empty(),
        }
    }

    /// Rows, or an empty slice for the empty state
    pub fn rows(&self) -> &[LoggedRow] {
        match self {
            LogTable::Empty => &[],
            LogTable::Loaded(rows) => rows,
        }
    }
}

/// Position of each expected column in the file header. Columns the file
/// lacks stay `None` and read back as null for every row.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    timestamp: Option<usize>,
    model_version: Option<usize>,
    model_type: Option<usize>,
    input_summary: Option<usize>,
    prediction: Option<usize>,
    latency_ms: Option<usize>,
    feedback_score: Option<usize>,
    feedback_text: Option<usize>,
}

impl ColumnIndex {
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| {
            let position = headers.iter().position(|h| h.trim() == name);
            if position.is_none() {
                debug!(column = name, "Monitoring log lacks column; filling with nulls");
            }
            position
        };

        Self {
            timestamp: find("timestamp"),
            model_version: find("model_version"),
            model_type: find("model_type"),
            input_summary: find("input_summary"),
            prediction: find("prediction"),
            latency_ms: find("latency_ms"),
            feedback_score: find("feedback_score"),
            feedback_text: find("feedback_text"),
        }
    }

    /// Map one raw record onto the fixed schema
    pub fn normalize(&self, record: &csv::StringRecord) -> LoggedRow {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };
        let text = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        LoggedRow {
            timestamp: cell(self.timestamp).and_then(parse_timestamp),
            model_version: cell(self.model_version).map(str::to_string),
            model_type: text(self.model_type),
            input_summary: text(self.input_summary),
            prediction: cell(self.prediction).and_then(parse_float),
            latency_ms: cell(self.latency_ms).and_then(parse_float),
            feedback_score: cell(self.feedback_score).and_then(parse_score),
            feedback_text: text(self.feedback_text),
        }
    }
}

/// Parse a logged timestamp. Naive values are taken as UTC; anything
/// unrecognised becomes `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

// Whole-number floats ("4.0") appear when another tool rewrote the file
fn parse_score(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        parse_float(raw)
            .filter(|value| value.fract() == 0.0)
            .map(|value| value as i64)
    })
}

/// Ascending, nulls last
pub fn timestamp_order(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending, nulls still last
pub fn timestamp_order_desc(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        _ => timestamp_order(a, b),
    }
}

/// Stable sort, so file order breaks ties
pub fn sort_by_timestamp(rows: &mut [LoggedRow]) {
    rows.sort_by(|a, b| timestamp_order(&a.timestamp, &b.timestamp));
}

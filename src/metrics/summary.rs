// Filtering and aggregate statistics over logged rows

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::table::{timestamp_order_desc, LoggedRow};

/// Label used for the pass-through filter
pub const ALL_VERSIONS: &str = "All";

/// Default number of comments shown on the dashboard
pub const DEFAULT_RECENT_COMMENTS: usize = 10;

/// Which model version the dashboard is looking at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionFilter {
    All,
    Version(String),
}

impl VersionFilter {
    /// "All" (case-sensitive, as offered in the version list) selects everything
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL_VERSIONS {
            VersionFilter::All
        } else {
            VersionFilter::Version(raw.to_string())
        }
    }

    pub fn matches(&self, row: &LoggedRow) -> bool {
        match self {
            VersionFilter::All => true,
            VersionFilter::Version(version) => row.model_version.as_deref() == Some(version.as_str()),
        }
    }

    /// Rows passing the filter, order preserved. No match is an empty vec.
    pub fn apply<'a>(&self, rows: &'a [LoggedRow]) -> Vec<&'a LoggedRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

impl fmt::Display for VersionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionFilter::All => f.write_str(ALL_VERSIONS),
            VersionFilter::Version(version) => f.write_str(version),
        }
    }
}

/// Filter choices: "All" followed by every distinct version, sorted
pub fn available_versions(rows: &[LoggedRow]) -> Vec<String> {
    let versions: BTreeSet<&str> = rows
        .iter()
        .filter_map(|row| row.model_version.as_deref())
        .collect();

    std::iter::once(ALL_VERSIONS.to_string())
        .chain(versions.into_iter().map(str::to_string))
        .collect()
}

/// Arithmetic mean; `None` for an empty input rather than NaN
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Render an optional statistic, "N/A" when there is nothing to show
pub fn format_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{:.*}", precision, value),
        _ => "N/A".to_string(),
    }
}

/// Headline numbers for the currently filtered view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_predictions: usize,
    pub avg_feedback_score: Option<f64>,
    pub avg_latency_ms: Option<f64>,
}

impl KeyMetrics {
    pub fn compute<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a LoggedRow>,
        I::IntoIter: Clone,
    {
        let rows = rows.into_iter();

        Self {
            total_predictions: rows.clone().count(),
            avg_feedback_score: mean(
                rows.clone()
                    .filter_map(|row| row.feedback_score)
                    .map(|score| score as f64),
            ),
            avg_latency_ms: mean(rows.filter_map(|row| row.latency_ms)),
        }
    }
}

/// One line of the model comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionSummary {
    pub model_version: String,
    pub avg_feedback_score: Option<f64>,
    pub avg_latency_ms: Option<f64>,
    pub total_predictions: usize,
}

#[derive(Default)]
struct Accumulator {
    score_sum: f64,
    score_count: usize,
    latency_sum: f64,
    latency_count: usize,
    rows: usize,
}

/// Group by model version (rows without one are skipped), ordered by version
pub fn summarize_by_version<'a, I>(rows: I) -> Vec<VersionSummary>
where
    I: IntoIterator<Item = &'a LoggedRow>,
{
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for row in rows {
        let Some(version) = row.model_version.as_deref() else {
            continue;
        };
        let acc = groups.entry(version).or_default();

        acc.rows += 1;
        if let Some(score) = row.feedback_score {
            acc.score_sum += score as f64;
            acc.score_count += 1;
        }
        if let Some(latency) = row.latency_ms {
            acc.latency_sum += latency;
            acc.latency_count += 1;
        }
    }

    groups
        .into_iter()
        .map(|(version, acc)| VersionSummary {
            model_version: version.to_string(),
            avg_feedback_score: (acc.score_count > 0)
                .then(|| acc.score_sum / acc.score_count as f64),
            avg_latency_ms: (acc.latency_count > 0)
                .then(|| acc.latency_sum / acc.latency_count as f64),
            total_predictions: acc.rows,
        })
        .collect()
}

/// Rows carrying a non-blank comment, newest first, at most `limit`
pub fn recent_comments<'a, I>(rows: I, limit: usize) -> Vec<&'a LoggedRow>
where
    I: IntoIterator<Item = &'a LoggedRow>,
{
    let mut comments: Vec<&LoggedRow> = rows
        .into_iter()
        .filter(|row| !row.feedback_text.trim().is_empty())
        .collect();

    comments.sort_by(|a, b| timestamp_order_desc(&a.timestamp, &b.timestamp));
    comments.truncate(limit);
    comments
}

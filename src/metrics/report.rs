// Snapshot of everything the monitoring dashboard shows

use serde::Serialize;

use super::summary::{
    available_versions, recent_comments, summarize_by_version, KeyMetrics, VersionFilter,
    VersionSummary,
};
use super::table::{LogTable, LoggedRow};

/// Dashboard contents for one filter selection.
///
/// Key metrics and raw rows follow the filter; the comparison table and
/// comments always cover every version so they stay comparable.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub filter: String,
    pub available_versions: Vec<String>,
    pub key_metrics: KeyMetrics,
    pub comparison: Vec<VersionSummary>,
    pub recent_comments: Vec<LoggedRow>,
    pub rows: Vec<LoggedRow>,
}

impl DashboardReport {
    /// `None` for the empty state, so callers can show a first-run message
    pub fn build(table: &LogTable, filter: &VersionFilter, comment_limit: usize) -> Option<Self> {
        if table.is_empty() {
            return None;
        }

        let all = table.rows();
        let filtered = filter.apply(all);

        Some(Self {
            filter: filter.to_string(),
            available_versions: available_versions(all),
            key_metrics: KeyMetrics::compute(filtered.iter().copied()),
            comparison: summarize_by_version(all),
            recent_comments: recent_comments(all, comment_limit)
                .into_iter()
                .cloned()
                .collect(),
            rows: filtered.into_iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DEFAULT_RECENT_COMMENTS;

    fn row(version: &str, score: i64, text: &str) -> LoggedRow {
        LoggedRow {
            timestamp: None,
            model_version: Some(version.to_string()),
            model_type: String::new(),
            input_summary: String::new(),
            prediction: Some(1.0),
            latency_ms: None,
            feedback_score: Some(score),
            feedback_text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_table_has_no_report() {
        assert!(DashboardReport::build(&LogTable::Empty, &VersionFilter::All, 10).is_none());
    }

    #[test]
    fn test_filter_scopes_metrics_but_not_comparison() {
        let table = LogTable::Loaded(vec![row("v1", 2, "meh"), row("v2", 5, ""), row("v2", 3, "")]);
        let report = DashboardReport::build(
            &table,
            &VersionFilter::parse("v2"),
            DEFAULT_RECENT_COMMENTS,
        )
        .unwrap();

        assert_eq!(report.filter, "v2");
        assert_eq!(report.key_metrics.total_predictions, 2);
        assert_eq!(report.key_metrics.avg_feedback_score, Some(4.0));
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.comparison.len(), 2);
        assert_eq!(report.recent_comments.len(), 1);
        assert_eq!(report.available_versions, vec!["All", "v1", "v2"]);
    }
}

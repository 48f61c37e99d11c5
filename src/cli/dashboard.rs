// Plain-text rendering of the monitoring dashboard

use chrono::{DateTime, Utc};

use crate::metrics::{format_stat, DashboardReport, LoggedRow};

/// Shown instead of the dashboard when nothing has been logged yet
pub const EMPTY_STATE_MESSAGE: &str = "No monitoring logs found yet. \
Run `salesmon predict ... --score <1-5>` at least once, then refresh this view.";

const BAR_WIDTH: f64 = 20.0;
const RULE: &str = "────────────────────────────────────────────────────────────";

/// "%Y-%m-%d %H:%M:%S", or "N/A" for rows whose timestamp didn't parse
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// "$1,234.56"; negative values as "-$1,234.56"
pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

fn format_score(score: Option<i64>) -> String {
    score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render the full dashboard. Raw rows are only listed when `show_raw` is set.
pub fn render_dashboard(report: &DashboardReport, show_raw: bool) -> String {
    let metrics = &report.key_metrics;

    let mut output = format!(
        "Model Monitoring & Feedback Dashboard\n\
        Model version: {}  (available: {})\n\n",
        report.filter,
        report.available_versions.join(", ")
    );

    output.push_str(&format!(
        "Key Metrics\n  \
        Total Predictions:   {}\n  \
        Avg Feedback Score:  {}\n  \
        Avg Latency (ms):    {}\n\
        {}\n",
        metrics.total_predictions,
        format_stat(metrics.avg_feedback_score, 2),
        format_stat(metrics.avg_latency_ms, 1),
        RULE
    ));

    output.push_str(&format_comparison(report));
    output.push_str(&format_feedback_bars(report));
    output.push_str(&format_comments(&report.recent_comments));

    if show_raw {
        output.push_str(&format_raw(&report.rows));
    }

    output
}

fn format_comparison(report: &DashboardReport) -> String {
    let mut output = String::from("Model Version Comparison (Aggregated)\n");
    output.push_str(&format!(
        "  {:<14} {:>18} {:>15} {:>17}\n",
        "model_version", "avg_feedback_score", "avg_latency_ms", "total_predictions"
    ));

    for summary in &report.comparison {
        output.push_str(&format!(
            "  {:<14} {:>18} {:>15} {:>17}\n",
            summary.model_version,
            format_stat(summary.avg_feedback_score, 2),
            format_stat(summary.avg_latency_ms, 1),
            summary.total_predictions
        ));
    }

    output.push('\n');
    output
}

fn format_feedback_bars(report: &DashboardReport) -> String {
    let mut output = String::from("Average Feedback Score by Model Version\n");

    let scored: Vec<_> = report
        .comparison
        .iter()
        .filter_map(|s| s.avg_feedback_score.map(|avg| (s.model_version.as_str(), avg)))
        .collect();

    if scored.is_empty() {
        output.push_str("  No feedback scores available yet.\n");
    }
    for (version, avg) in scored {
        let width = ((avg / 5.0) * BAR_WIDTH).round().clamp(0.0, BAR_WIDTH) as usize;
        output.push_str(&format!("  {:<14} {:>5.2} {}\n", version, avg, "█".repeat(width)));
    }

    output.push('\n');
    output
}

fn format_comments(comments: &[LoggedRow]) -> String {
    let mut output = String::from("Recent Comments\n");

    if comments.is_empty() {
        output.push_str("  No qualitative comments yet.\n");
    }
    for row in comments {
        output.push_str(&format!(
            "  [{}] {} – Score: {}\n    {}\n",
            format_timestamp(row.timestamp),
            row.model_version.as_deref().unwrap_or("N/A"),
            format_score(row.feedback_score),
            row.feedback_text.trim()
        ));
    }

    output.push_str(RULE);
    output.push('\n');
    output
}

fn format_raw(rows: &[LoggedRow]) -> String {
    let mut output = String::from(
        "Raw Monitoring Logs\n  \
        timestamp | model_version | model_type | input_summary | prediction | latency_ms | feedback_score | feedback_text\n",
    );

    for row in rows {
        output.push_str(&format!(
            "  {} | {} | {} | {} | {} | {} | {} | {}\n",
            format_timestamp(row.timestamp),
            row.model_version.as_deref().unwrap_or(""),
            row.model_type,
            row.input_summary,
            optional(row.prediction),
            optional(row.latency_ms),
            row.feedback_score.map(|s| s.to_string()).unwrap_or_default(),
            row.feedback_text
        ));
    }

    output
}

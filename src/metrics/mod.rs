// Metrics module
// Loading, filtering and aggregating the monitoring log

mod cache;
mod report;
mod summary;
mod table;

pub use cache::{CachedLogReader, DEFAULT_CACHE_TTL};
pub use report::DashboardReport;
pub use summary::{
    available_versions, format_stat, mean, recent_comments, summarize_by_version, KeyMetrics,
    VersionFilter, VersionSummary, ALL_VERSIONS, DEFAULT_RECENT_COMMENTS,
};
pub use table::{parse_timestamp, sort_by_timestamp, ColumnIndex, LogTable, LoggedRow};

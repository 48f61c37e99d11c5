// Subcommand handling

use anyhow::Result;
use clap::Subcommand;
use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use super::dashboard::{format_currency, render_dashboard, EMPTY_STATE_MESSAGE};
use crate::config::Config;
use crate::logging::{PredictionLogger, Record};
use crate::metrics::{CachedLogReader, DashboardReport, LogTable, VersionFilter};
use crate::models::{BaselineModel, ImprovedModel, Loadable, PredictionInput, ReferenceCategories};
use crate::session::{PredictionPair, PredictionSession};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Append one prediction + feedback record to the monitoring log
    Record {
        /// Model identifier, e.g. v1 or v2
        #[arg(long)]
        model_version: String,

        /// Free-form model label, e.g. baseline
        #[arg(long)]
        model_type: String,

        /// Human-readable summary of the request inputs
        #[arg(long = "input", default_value = "")]
        input_summary: String,

        /// Predicted value (must be numeric)
        #[arg(long, allow_hyphen_values = true)]
        prediction: String,

        #[arg(long)]
        latency_ms: Option<f64>,

        /// Feedback score, 1-5
        #[arg(long)]
        score: Option<i64>,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Run both models on one input and optionally log feedback for them
    Predict {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        row_id: u64,

        /// Defaults to the first reference region
        #[arg(long)]
        region: Option<String>,

        /// Defaults to the first reference sub-category
        #[arg(long)]
        sub_category: Option<String>,

        /// How useful were these predictions? (1 = Poor, 5 = Excellent)
        #[arg(long)]
        score: Option<i64>,

        /// Optional comment, logged with the score
        #[arg(long, requires = "score")]
        comment: Option<String>,
    },

    /// Show aggregate statistics from the monitoring log
    Dashboard {
        /// "All" or a model version
        #[arg(long, default_value = "All")]
        model: String,

        /// Also list the raw rows of the selected version
        #[arg(long)]
        raw: bool,

        /// Print the report as JSON
        #[arg(long, conflicts_with = "watch")]
        json: bool,

        /// Redraw every N seconds until interrupted
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// List the valid Region and Sub-Category values
    Categories,
}

/// Run a one-shot command and return its output
pub fn handle_command(command: Command, config: &Config) -> Result<String> {
    match command {
        Command::Record {
            model_version,
            model_type,
            input_summary,
            prediction,
            latency_ms,
            score,
            comment,
        } => {
            let prediction = Record::parse_prediction(&prediction)?;
            let logger = PredictionLogger::new(config.log_path.clone())?;
            logger.record(
                &model_version,
                &model_type,
                &input_summary,
                prediction,
                latency_ms,
                score,
                comment.as_deref(),
            )?;
            info!(model_version = %model_version, "Recorded prediction");
            Ok(format!("Logged 1 record to {}\n", logger.path().display()))
        }
        Command::Predict {
            row_id,
            region,
            sub_category,
            score,
            comment,
        } => run_predict(config, row_id, region, sub_category, score, comment),
        Command::Dashboard {
            model, raw, json, ..
        } => {
            let table = LogTable::load(&config.log_path)?;
            render(&table, &VersionFilter::parse(&model), raw, json, config)
        }
        Command::Categories => Ok(format_categories(&ReferenceCategories::load(
            &config.reference_csv,
        ))),
    }
}

/// Redraw the dashboard every `interval`, reading through the cache
pub fn watch_dashboard(
    config: &Config,
    model: &str,
    raw: bool,
    interval: Duration,
    out: &mut dyn Write,
) -> Result<()> {
    let filter = VersionFilter::parse(model);
    let mut reader = CachedLogReader::new(config.log_path.clone(), config.dashboard.cache_ttl());

    loop {
        let text = render(reader.read()?, &filter, raw, false, config)?;
        write!(out, "\x1b[2J\x1b[H{}", text)?;
        out.flush()?;
        thread::sleep(interval);
    }
}

fn render(
    table: &LogTable,
    filter: &VersionFilter,
    raw: bool,
    json: bool,
    config: &Config,
) -> Result<String> {
    let report = DashboardReport::build(table, filter, config.dashboard.recent_comments);

    match (report, json) {
        (Some(report), true) => Ok(serde_json::to_string_pretty(&report)? + "\n"),
        (Some(report), false) => Ok(render_dashboard(&report, raw)),
        (None, true) => Ok(serde_json::json!({ "empty": true, "message": EMPTY_STATE_MESSAGE })
            .to_string()
            + "\n"),
        (None, false) => Ok(format!("{}\n", EMPTY_STATE_MESSAGE)),
    }
}

fn run_predict(
    config: &Config,
    row_id: u64,
    region: Option<String>,
    sub_category: Option<String>,
    score: Option<i64>,
    comment: Option<String>,
) -> Result<String> {
    let categories = ReferenceCategories::load(&config.reference_csv);
    let region = region.unwrap_or_else(|| categories.default_region().to_string());
    let sub_category =
        sub_category.unwrap_or_else(|| categories.default_sub_category().to_string());

    if !categories.has_region(&region) {
        warn!(region = %region, "Region not among reference categories");
    }
    if !categories.has_sub_category(&sub_category) {
        warn!(sub_category = %sub_category, "Sub-Category not among reference categories");
    }

    let baseline = BaselineModel::load(&config.models.baseline_path)?;
    let improved = ImprovedModel::load(&config.models.improved_path)?;
    let input = PredictionInput::new(row_id, &region, &sub_category);

    let mut session = PredictionSession::new();
    let mut output = format_prediction(session.run_prediction(&input, &baseline, &improved)?);

    match score {
        Some(score) => {
            let logger = PredictionLogger::new(config.log_path.clone())?;
            session.submit_feedback(&logger, score, comment.as_deref())?;
            info!(score, path = %logger.path().display(), "Feedback logged");
            output.push_str(&format!(
                "\nFeedback and predictions have been saved to {}.\n\
                 You can now view them with `salesmon dashboard`.\n",
                logger.path().display()
            ));
        }
        None => output.push_str(
            "\nPass --score <1-5> (and optionally --comment) to log feedback on these predictions.\n",
        ),
    }

    Ok(output)
}

fn format_prediction(pair: &PredictionPair) -> String {
    format!(
        "Input: {}\n\n\
         Predictions (Sales)\n\
         Model v1 (baseline - Row ID only): {}\n\
         Latency v1: {:.1} ms\n\
         Model v2 (improved - Row ID + Region + Sub-Category): {}\n\
         Latency v2: {:.1} ms\n",
        pair.input_summary,
        format_currency(pair.baseline.prediction),
        pair.baseline.latency_ms,
        format_currency(pair.improved.prediction),
        pair.improved.latency_ms,
    )
}

fn format_categories(categories: &ReferenceCategories) -> String {
    format!(
        "Regions: {}\nSub-Categories: {}\n",
        categories.regions.join(", "),
        categories.sub_categories.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.log_path = dir.join("monitoring_logs.csv");
        config.reference_csv = dir.join("sales.csv");
        config.models.baseline_path = dir.join("v1.json");
        config.models.improved_path = dir.join("v2.json");
        fs::write(&config.models.baseline_path, r#"{"intercept": 1000.0, "row_id_coef": 0.5}"#)
            .unwrap();
        fs::write(
            &config.models.improved_path,
            r#"{"intercept": 500.0, "row_id_coef": 1.0, "region_weights": {"Central": 25.0}}"#,
        )
        .unwrap();
        config
    }

    #[test]
    fn test_dashboard_on_fresh_install_shows_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let out = handle_command(
            Command::Dashboard {
                model: "All".into(),
                raw: false,
                json: false,
                watch: None,
            },
            &config,
        )
        .unwrap();
        assert!(out.contains("No monitoring logs found yet"));
    }

    #[test]
    fn test_predict_without_score_logs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let out = handle_command(
            Command::Predict {
                row_id: 10,
                region: None,
                sub_category: None,
                score: None,
                comment: None,
            },
            &config,
        )
        .unwrap();

        assert!(out.contains("Model v1 (baseline - Row ID only): $1,005.00"));
        assert!(out.contains("Model v2 (improved - Row ID + Region + Sub-Category): $535.00"));
        assert!(!config.log_path.exists());
    }

    #[test]
    fn test_predict_with_score_feeds_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        handle_command(
            Command::Predict {
                row_id: 2,
                region: Some("West".into()),
                sub_category: Some("Phones".into()),
                score: Some(4),
                comment: Some("close enough".into()),
            },
            &config,
        )
        .unwrap();

        let out = handle_command(
            Command::Dashboard {
                model: "v2".into(),
                raw: false,
                json: true,
                watch: None,
            },
            &config,
        )
        .unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["filter"], "v2");
        assert_eq!(report["key_metrics"]["total_predictions"], 1);
        assert_eq!(report["comparison"].as_array().unwrap().len(), 2);
        assert_eq!(report["recent_comments"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_record_rejects_non_numeric_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let result = handle_command(
            Command::Record {
                model_version: "v1".into(),
                model_type: "baseline".into(),
                input_summary: String::new(),
                prediction: "lots".into(),
                latency_ms: None,
                score: None,
                comment: None,
            },
            &config,
        );
        assert!(result.is_err());
        assert!(!config.log_path.exists());
    }

    #[test]
    fn test_record_rejects_nan_latency() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let err = handle_command(
            Command::Record {
                model_version: "v1".into(),
                model_type: "baseline".into(),
                input_summary: String::new(),
                prediction: "1.5".into(),
                latency_ms: Some(f64::NAN),
                score: Some(3),
                comment: None,
            },
            &config,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::errors::MonitorError>(),
            Some(crate::errors::MonitorError::NonNumericLatency(_))
        ));
        assert!(!config.log_path.exists());
    }

    #[test]
    fn test_categories_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let out = handle_command(Command::Categories, &config).unwrap();
        assert_eq!(
            out,
            "Regions: Central, East, South, West\nSub-Categories: Chairs, Phones, Binders, Storage\n"
        );
    }
}

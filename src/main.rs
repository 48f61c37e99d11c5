// Salesmon - prediction + feedback monitoring for two sales models
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use salesmon::cli::{handle_command, watch_dashboard, Command};
use salesmon::config::load_config;

/// Log model predictions with user feedback and report on them
#[derive(Parser, Debug)]
#[command(name = "salesmon")]
#[command(version)]
struct Args {
    /// Path to configuration file (default: ~/.salesmon/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Monitoring log location; overrides config and SALESMON_LOG_PATH
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(log_path) = args.log_path {
        config.log_path = log_path;
    }

    match args.command {
        Command::Dashboard {
            model,
            raw,
            watch: Some(secs),
            ..
        } => watch_dashboard(
            &config,
            &model,
            raw,
            Duration::from_secs(secs.max(1)),
            &mut std::io::stdout(),
        ),
        command => {
            let output = handle_command(command, &config)?;
            print!("{}", output);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_arguments_parse() {
        let args = Args::try_parse_from([
            "salesmon",
            "record",
            "--model-version",
            "v1",
            "--model-type",
            "baseline",
            "--input",
            "Row ID=1, Region=West, Sub-Category=Chairs",
            "--prediction",
            "-1.5",
            "--latency-ms",
            "2.25",
            "--score",
            "4",
            "--comment",
            "close enough",
            "--log-path",
            "/tmp/monitoring_logs.csv",
        ])
        .unwrap();

        assert_eq!(args.log_path, Some(PathBuf::from("/tmp/monitoring_logs.csv")));
        match args.command {
            Command::Record {
                model_version,
                model_type,
                input_summary,
                prediction,
                latency_ms,
                score,
                comment,
            } => {
                assert_eq!(model_version, "v1");
                assert_eq!(model_type, "baseline");
                assert_eq!(input_summary, "Row ID=1, Region=West, Sub-Category=Chairs");
                assert_eq!(prediction, "-1.5");
                assert_eq!(latency_ms, Some(2.25));
                assert_eq!(score, Some(4));
                assert_eq!(comment.as_deref(), Some("close enough"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_version_flag_is_not_a_record_argument() {
        let parsed = Args::try_parse_from([
            "salesmon",
            "record",
            "--version",
            "v1",
            "--model-type",
            "baseline",
            "--prediction",
            "1.5",
        ]);
        assert!(parsed.is_err());
    }
}

// Prediction session
//
// Carries one "run prediction" result to the "submit feedback" step.
// Each user/request owns its own session; nothing is global.

use anyhow::Result;
use std::time::Instant;
use tracing::{debug, warn};

use crate::errors::MonitorError;
use crate::logging::{PredictionLogger, Record};
use crate::models::{ModelOracle, PredictionInput};

/// Output of one model for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRun {
    pub model_version: String,
    pub model_type: String,
    pub prediction: f64,
    pub latency_ms: f64,
}

/// Both model runs for the same input
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPair {
    pub input_summary: String,
    pub baseline: ModelRun,
    pub improved: ModelRun,
}

#[derive(Debug, Default)]
pub struct PredictionSession {
    last: Option<PredictionPair>,
}

impl PredictionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a prediction has run in this session
    pub fn is_ready(&self) -> bool {
        self.last.is_some()
    }

    pub fn last_prediction(&self) -> Option<&PredictionPair> {
        self.last.as_ref()
    }

    /// Run both models, each timed separately. Replaces any earlier result.
    pub fn run_prediction(
        &mut self,
        input: &PredictionInput,
        baseline: &dyn ModelOracle,
        improved: &dyn ModelOracle,
    ) -> Result<&PredictionPair> {
        let pair = PredictionPair {
            input_summary: input.summary(),
            baseline: timed(baseline, input)?,
            improved: timed(improved, input)?,
        };

        debug!(
            input = %pair.input_summary,
            baseline = pair.baseline.prediction,
            improved = pair.improved.prediction,
            "Prediction ready"
        );

        Ok(self.last.insert(pair))
    }

    /// Log both model runs with the user's feedback.
    ///
    /// Fails with `MonitorError::NoPrediction` (and writes nothing) if no
    /// prediction has run yet. Both records are validated before either is
    /// written.
    pub fn submit_feedback(
        &self,
        logger: &PredictionLogger,
        feedback_score: i64,
        feedback_text: Option<&str>,
    ) -> Result<()> {
        let Some(pair) = &self.last else {
            warn!("Feedback submitted before any prediction; nothing logged");
            return Err(MonitorError::NoPrediction.into());
        };

        let records = [&pair.baseline, &pair.improved]
            .into_iter()
            .map(|run| {
                Record::new(
                    &run.model_version,
                    &run.model_type,
                    &pair.input_summary,
                    run.prediction,
                    Some(run.latency_ms),
                    Some(feedback_score),
                    feedback_text,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        for record in &records {
            logger.append(record)?;
        }
        Ok(())
    }
}

fn timed(oracle: &dyn ModelOracle, input: &PredictionInput) -> Result<ModelRun> {
    let started = Instant::now();
    let prediction = oracle.predict(input)?;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    Ok(ModelRun {
        model_version: oracle.version().to_string(),
        model_type: oracle.model_type().to_string(),
        prediction,
        latency_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::LogTable;
    use crate::models::{BaselineModel, ImprovedModel};
    use std::collections::HashMap;

    fn models() -> (BaselineModel, ImprovedModel) {
        (
            BaselineModel {
                intercept: 100.0,
                row_id_coef: 1.0,
            },
            ImprovedModel {
                intercept: 50.0,
                row_id_coef: 2.0,
                region_weights: HashMap::from([("West".to_string(), 10.0)]),
                sub_category_weights: HashMap::new(),
            },
        )
    }

    fn logger_in_tempdir() -> (PredictionLogger, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let logger = PredictionLogger::new(dir.path().join("logs.csv")).unwrap();
        (logger, dir)
    }

    #[test]
    fn test_feedback_before_prediction_is_rejected() {
        let (logger, _dir) = logger_in_tempdir();
        let session = PredictionSession::new();

        let err = session.submit_feedback(&logger, 4, Some("nice")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MonitorError>(),
            Some(MonitorError::NoPrediction)
        ));
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_run_prediction_stores_both_models() {
        let (baseline, improved) = models();
        let mut session = PredictionSession::new();
        assert!(!session.is_ready());

        let input = PredictionInput::new(5, "West", "Chairs");
        let pair = session.run_prediction(&input, &baseline, &improved).unwrap();

        assert_eq!(pair.baseline.prediction, 105.0);
        assert_eq!(pair.improved.prediction, 70.0);
        assert_eq!(pair.baseline.model_version, "v1");
        assert_eq!(pair.improved.model_type, "improved");
        assert!(pair.baseline.latency_ms >= 0.0);
        assert!(session.is_ready());
    }

    #[test]
    fn test_submit_feedback_logs_one_row_per_model() {
        let (logger, _dir) = logger_in_tempdir();
        let (baseline, improved) = models();
        let mut session = PredictionSession::new();
        session
            .run_prediction(&PredictionInput::new(1, "East", "Phones"), &baseline, &improved)
            .unwrap();

        session.submit_feedback(&logger, 5, Some("spot on")).unwrap();

        let table = LogTable::load(logger.path()).unwrap();
        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model_version.as_deref(), Some("v1"));
        assert_eq!(rows[1].model_version.as_deref(), Some("v2"));
        for row in rows {
            assert_eq!(row.feedback_score, Some(5));
            assert_eq!(row.feedback_text, "spot on");
            assert_eq!(row.input_summary, "Row ID=1, Region=East, Sub-Category=Phones");
            assert!(row.latency_ms.is_some());
        }
    }

    #[test]
    fn test_invalid_score_writes_nothing() {
        let (logger, _dir) = logger_in_tempdir();
        let (baseline, improved) = models();
        let mut session = PredictionSession::new();
        session
            .run_prediction(&PredictionInput::new(1, "East", "Phones"), &baseline, &improved)
            .unwrap();

        assert!(session.submit_feedback(&logger, 7, None).is_err());
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_rerun_replaces_previous_prediction() {
        let (baseline, improved) = models();
        let mut session = PredictionSession::new();
        session
            .run_prediction(&PredictionInput::new(1, "East", "Phones"), &baseline, &improved)
            .unwrap();
        session
            .run_prediction(&PredictionInput::new(9, "West", "Chairs"), &baseline, &improved)
            .unwrap();

        let last = session.last_prediction().unwrap();
        assert_eq!(last.baseline.prediction, 109.0);
        assert!(last.input_summary.starts_with("Row ID=9"));
    }
}

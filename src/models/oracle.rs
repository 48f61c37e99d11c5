// Prediction models behind the app: a baseline that only sees the row id
// and an improved one that also uses the two categorical fields

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::MonitorError;

pub const BASELINE_VERSION: &str = "v1";
pub const BASELINE_TYPE: &str = "baseline";
pub const IMPROVED_VERSION: &str = "v2";
pub const IMPROVED_TYPE: &str = "improved";

/// Inputs collected for one prediction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionInput {
    pub row_id: u64,
    pub region: String,
    pub sub_category: String,
}

impl PredictionInput {
    pub fn new(row_id: u64, region: &str, sub_category: &str) -> Self {
        Self {
            row_id,
            region: region.to_string(),
            sub_category: sub_category.to_string(),
        }
    }

    /// Human-readable echo stored in the log's `input_summary` column
    pub fn summary(&self) -> String {
        format!(
            "Row ID={}, Region={}, Sub-Category={}",
            self.row_id, self.region, self.sub_category
        )
    }
}

/// Anything that can turn a request into a sales figure
pub trait ModelOracle {
    /// Identifier written to the log ("v1", "v2")
    fn version(&self) -> &str;

    /// Free-form label written to the log
    fn model_type(&self) -> &str;

    fn predict(&self, input: &PredictionInput) -> Result<f64>;
}

/// Model persistence (coefficients as JSON)
pub trait Loadable: Sized + DeserializeOwned {
    fn load(path: &Path) -> Result<Self> {
        let model_load = |reason: String| MonitorError::ModelLoad {
            path: path.display().to_string(),
            reason,
        };

        let json = std::fs::read_to_string(path).map_err(|e| model_load(e.to_string()))?;
        let model = serde_json::from_str(&json).map_err(|e| model_load(e.to_string()))?;
        Ok(model)
    }
}

fn checked(prediction: f64) -> Result<f64> {
    if prediction.is_finite() {
        Ok(prediction)
    } else {
        Err(MonitorError::NonNumericPrediction(prediction.to_string()).into())
    }
}

/// v1: linear in the row id only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineModel {
    pub intercept: f64,
    pub row_id_coef: f64,
}

impl Loadable for BaselineModel {}

impl ModelOracle for BaselineModel {
    fn version(&self) -> &str {
        BASELINE_VERSION
    }

    fn model_type(&self) -> &str {
        BASELINE_TYPE
    }

    fn predict(&self, input: &PredictionInput) -> Result<f64> {
        checked(self.intercept + self.row_id_coef * input.row_id as f64)
    }
}

/// v2: row id plus one-hot region and sub-category weights.
/// Categories missing from the weight tables contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovedModel {
    pub intercept: f64,
    pub row_id_coef: f64,
    #[serde(default)]
    pub region_weights: HashMap<String, f64>,
    #[serde(default)]
    pub sub_category_weights: HashMap<String, f64>,
}

impl Loadable for ImprovedModel {}

impl ModelOracle for ImprovedModel {
    fn version(&self) -> &str {
        IMPROVED_VERSION
    }

    fn model_type(&self) -> &str {
        IMPROVED_TYPE
    }

    fn predict(&self, input: &PredictionInput) -> Result<f64> {
        let region = self.region_weights.get(&input.region).copied().unwrap_or(0.0);
        let sub_category = self
            .sub_category_weights
            .get(&input.sub_category)
            .copied()
            .unwrap_or(0.0);

        checked(self.intercept + self.row_id_coef * input.row_id as f64 + region + sub_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn improved() -> ImprovedModel {
        ImprovedModel {
            intercept: 100.0,
            row_id_coef: 0.5,
            region_weights: HashMap::from([("West".to_string(), 20.0)]),
            sub_category_weights: HashMap::from([("Chairs".to_string(), -5.0)]),
        }
    }

    #[test]
    fn test_summary_format() {
        let input = PredictionInput::new(7, "East", "Phones");
        assert_eq!(input.summary(), "Row ID=7, Region=East, Sub-Category=Phones");
    }

    #[test]
    fn test_baseline_ignores_categories() {
        let model = BaselineModel {
            intercept: 10.0,
            row_id_coef: 2.0,
        };
        let a = model.predict(&PredictionInput::new(3, "West", "Chairs")).unwrap();
        let b = model.predict(&PredictionInput::new(3, "East", "Phones")).unwrap();
        assert_eq!(a, 16.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_improved_uses_category_weights() {
        let model = improved();
        let prediction = model.predict(&PredictionInput::new(10, "West", "Chairs")).unwrap();
        assert_eq!(prediction, 120.0);
    }

    #[test]
    fn test_improved_ignores_unknown_categories() {
        let model = improved();
        let prediction = model.predict(&PredictionInput::new(10, "Mars", "Rockets")).unwrap();
        assert_eq!(prediction, 105.0);
    }

    #[test]
    fn test_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v2.json");
        std::fs::write(
            &path,
            r#"{"intercept": 1.0, "row_id_coef": 0.0, "region_weights": {"South": 2.0}}"#,
        )
        .unwrap();

        let model = ImprovedModel::load(&path).unwrap();
        assert_eq!(model.region_weights.get("South"), Some(&2.0));
        assert!(model.sub_category_weights.is_empty());
    }

    #[test]
    fn test_missing_model_file_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BaselineModel::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MonitorError>(),
            Some(MonitorError::ModelLoad { .. })
        ));
    }

    #[test]
    fn test_non_finite_prediction_is_rejected() {
        let model = BaselineModel {
            intercept: f64::MAX,
            row_id_coef: f64::MAX,
        };
        assert!(model.predict(&PredictionInput::new(5, "", "")).is_err());
    }
}

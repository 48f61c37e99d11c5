// Prediction models and their reference inputs

pub mod categories;
pub mod oracle;

pub use categories::{ReferenceCategories, DEFAULT_REGIONS, DEFAULT_SUB_CATEGORIES};
pub use oracle::{
    BaselineModel, ImprovedModel, Loadable, ModelOracle, PredictionInput, BASELINE_TYPE,
    BASELINE_VERSION, IMPROVED_TYPE, IMPROVED_VERSION,
};

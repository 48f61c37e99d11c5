// Valid categorical inputs, read from the training dataset when available

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_REGIONS: [&str; 4] = ["Central", "East", "South", "West"];
pub const DEFAULT_SUB_CATEGORIES: [&str; 4] = ["Chairs", "Phones", "Binders", "Storage"];

const REGION_COLUMN: &str = "Region";
const SUB_CATEGORY_COLUMN: &str = "Sub-Category";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceCategories {
    pub regions: Vec<String>,
    pub sub_categories: Vec<String>,
}

impl Default for ReferenceCategories {
    fn default() -> Self {
        Self {
            regions: to_strings(&DEFAULT_REGIONS),
            sub_categories: to_strings(&DEFAULT_SUB_CATEGORIES),
        }
    }
}

impl ReferenceCategories {
    /// Sorted distinct values from the dataset. Never fails: an unreadable
    /// file falls back to the defaults, a missing column falls back for that
    /// list only.
    pub fn load(path: &Path) -> Self {
        let (regions, sub_categories) = match read_columns(path) {
            Ok(columns) => columns,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Using default reference categories");
                (Vec::new(), Vec::new())
            }
        };

        Self {
            regions: or_defaults(regions, &DEFAULT_REGIONS),
            sub_categories: or_defaults(sub_categories, &DEFAULT_SUB_CATEGORIES),
        }
    }

    /// First region in the list, used when the caller picks none
    pub fn default_region(&self) -> &str {
        self.regions.first().map(String::as_str).unwrap_or(DEFAULT_REGIONS[0])
    }

    pub fn default_sub_category(&self) -> &str {
        self.sub_categories
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_SUB_CATEGORIES[0])
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    pub fn has_sub_category(&self, sub_category: &str) -> bool {
        self.sub_categories.iter().any(|s| s == sub_category)
    }
}

fn read_columns(path: &Path) -> Result<(Vec<String>, Vec<String>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open reference dataset: {}", path.display()))?;

    let headers = reader.headers().context("Failed to read dataset header")?.clone();
    let region_idx = headers.iter().position(|h| h == REGION_COLUMN);
    let sub_category_idx = headers.iter().position(|h| h == SUB_CATEGORY_COLUMN);

    let mut regions = BTreeSet::new();
    let mut sub_categories = BTreeSet::new();

    for record in reader.records() {
        let record = record.context("Failed to parse reference dataset")?;
        collect(&record, region_idx, &mut regions);
        collect(&record, sub_category_idx, &mut sub_categories);
    }

    Ok((
        regions.into_iter().collect(),
        sub_categories.into_iter().collect(),
    ))
}

fn collect(record: &csv::StringRecord, index: Option<usize>, into: &mut BTreeSet<String>) {
    if let Some(value) = index.and_then(|i| record.get(i)).map(str::trim) {
        if !value.is_empty() {
            into.insert(value.to_string());
        }
    }
}

fn or_defaults(values: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if values.is_empty() {
        to_strings(defaults)
    } else {
        values
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

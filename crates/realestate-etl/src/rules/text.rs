//! Categorical text normalization.

use super::{ColumnRule, missing_in};
use crate::error::Result;
use crate::types::RuleReport;
use crate::utils::{MISSING_MARKER, collapse_whitespace, has_column, text_values, title_case};
use polars::prelude::*;
use tracing::debug;

/// Title-cases the configured categorical columns in place.
pub struct CategoricalNormalizer {
    columns: Vec<String>,
}

impl CategoricalNormalizer {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

/// Normalize one categorical value.
///
/// The literal `nan` (case-sensitive) counts as missing. Anything else is
/// whitespace-collapsed and title-cased.
pub fn normalize_category(value: Option<&str>) -> Option<String> {
    match value {
        None => None,
        Some(MISSING_MARKER) => None,
        Some(v) => Some(title_case(&collapse_whitespace(v))),
    }
}

impl ColumnRule for CategoricalNormalizer {
    fn name(&self) -> &'static str {
        "categorical_text"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        let mut touched = Vec::new();

        for name in &self.columns {
            if !has_column(df, name) {
                debug!("Categorical column '{}' absent, skipping", name);
                continue;
            }

            let normalized: Vec<Option<String>> = text_values(df, name)?
                .iter()
                .map(|v| normalize_category(v.as_deref()))
                .collect();
            df.replace(name, Series::new(name.as_str().into(), normalized))?;
            touched.push(name.clone());
        }

        if touched.is_empty() {
            return Ok(RuleReport::skipped(
                self.name(),
                "No categorical columns present",
            ));
        }

        let refs: Vec<&str> = touched.iter().map(String::as_str).collect();
        let missing = missing_in(df, &refs);
        debug!("Normalized {} categorical columns", touched.len());
        let detail = format!("Title-cased {} categorical columns", touched.len());
        Ok(RuleReport::applied(self.name(), touched, detail, missing))
    }
}

//! Column header normalization.

use super::ColumnRule;
use crate::error::Result;
use crate::types::RuleReport;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Strips leading and trailing whitespace from every column name.
///
/// Casing and internal characters are left alone. If a trimmed name would
/// collide with another column, the column keeps its original name.
pub struct HeaderNormalizer;

impl ColumnRule for HeaderNormalizer {
    fn name(&self) -> &'static str {
        "headers"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let mut taken: HashSet<String> = names.iter().cloned().collect();
        let mut renamed = Vec::new();

        for name in &names {
            let trimmed = name.trim();
            if trimmed == name {
                continue;
            }
            if taken.contains(trimmed) {
                warn!(
                    "Keeping column '{}' untrimmed: '{}' already exists",
                    name, trimmed
                );
                continue;
            }
            df.rename(name, trimmed.into())?;
            taken.remove(name);
            taken.insert(trimmed.to_string());
            renamed.push(trimmed.to_string());
        }

        debug!("Trimmed {} column names", renamed.len());
        let detail = format!("Trimmed whitespace from {} column names", renamed.len());
        Ok(RuleReport::applied(self.name(), renamed, detail, 0))
    }
}

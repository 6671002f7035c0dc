//! Grouped median imputation.

use crate::error::Result;
use crate::rules::ColumnRule;
use crate::types::RuleReport;
use crate::utils::{has_column, median, median_of_present, numeric_values, text_values};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Fill missing values from per-group medians, then from the global median.
///
/// Pass 1 fills a missing value with the median of the present values that
/// share its group key; rows without a group key are left for pass 2.
/// Pass 2 fills whatever is still missing with the median of the column as
/// it stands after pass 1. With no present value anywhere, nothing changes.
pub fn impute_grouped_median(
    values: &[Option<f64>],
    groups: Option<&[Option<String>]>,
) -> Vec<Option<f64>> {
    let mut filled = values.to_vec();

    if let Some(groups) = groups {
        let mut members: HashMap<&str, Vec<f64>> = HashMap::new();
        for (value, group) in values.iter().zip(groups) {
            if let (Some(v), Some(g)) = (value, group) {
                members.entry(g.as_str()).or_default().push(*v);
            }
        }
        let group_medians: HashMap<&str, f64> = members
            .into_iter()
            .filter_map(|(g, vs)| median(&vs).map(|m| (g, m)))
            .collect();

        for (slot, group) in filled.iter_mut().zip(groups) {
            if slot.is_none()
                && let Some(g) = group
            {
                *slot = group_medians.get(g.as_str()).copied();
            }
        }
    }

    if let Some(global) = median_of_present(&filled) {
        for slot in filled.iter_mut().filter(|v| v.is_none()) {
            *slot = Some(global);
        }
    }

    filled
}

/// Imputes a numeric column by group median with a global fallback.
///
/// The column is converted to `Float64` in place. Skipped entirely when the
/// column is absent; the group pass is skipped when the group column is absent.
pub struct GroupedMedianImputer {
    column: String,
    group_column: String,
}

impl GroupedMedianImputer {
    pub fn new(column: impl Into<String>, group_column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            group_column: group_column.into(),
        }
    }
}

impl ColumnRule for GroupedMedianImputer {
    fn name(&self) -> &'static str {
        "amenity_imputation"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        if !has_column(df, &self.column) {
            debug!("Column '{}' absent, skipping imputation", self.column);
            return Ok(RuleReport::skipped(
                self.name(),
                format!("'{}' absent", self.column),
            ));
        }

        let values = numeric_values(df, &self.column)?;
        let missing_before = values.iter().filter(|v| v.is_none()).count();

        let groups = if has_column(df, &self.group_column) {
            Some(text_values(df, &self.group_column)?)
        } else {
            debug!(
                "Group column '{}' absent, using global median only",
                self.group_column
            );
            None
        };

        let imputed = impute_grouped_median(&values, groups.as_deref());
        let missing_after = imputed.iter().filter(|v| v.is_none()).count();
        df.replace(&self.column, Series::new(self.column.as_str().into(), imputed))?;

        debug!(
            "Imputed {} missing '{}' values",
            missing_before - missing_after,
            self.column
        );
        Ok(RuleReport::applied(
            self.name(),
            vec![self.column.clone()],
            format!(
                "Filled {} of {} missing values by '{}' median",
                missing_before - missing_after,
                missing_before,
                self.group_column
            ),
            missing_after,
        ))
    }
}

//! Result and summary types for the cleaning pipeline.

use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Whether a rule changed the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The rule ran and wrote its output column(s).
    Applied,
    /// The rule's source column was absent and it wrote nothing.
    Skipped,
}

/// What a single column rule did during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleReport {
    /// Rule name (e.g. "currency").
    pub rule: String,
    /// Columns the rule wrote or mutated.
    pub columns: Vec<String>,
    /// Applied or skipped.
    pub outcome: RuleOutcome,
    /// Human-readable description of the change.
    pub detail: String,
    /// Missing values left in the written columns after the rule ran.
    pub missing_after: usize,
}

impl RuleReport {
    /// Report for a rule that wrote `columns`.
    pub fn applied(
        rule: impl Into<String>,
        columns: Vec<String>,
        detail: impl Into<String>,
        missing_after: usize,
    ) -> Self {
        Self {
            rule: rule.into(),
            columns,
            outcome: RuleOutcome::Applied,
            detail: detail.into(),
            missing_after,
        }
    }

    /// Report for a rule that found nothing to do.
    pub fn skipped(rule: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            columns: Vec::new(),
            outcome: RuleOutcome::Skipped,
            detail: detail.into(),
            missing_after: 0,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome == RuleOutcome::Applied
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Row count (identical before and after).
    pub rows: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Columns that did not exist in the input.
    pub added_columns: Vec<String>,
    /// One entry per rule, in execution order.
    pub rule_reports: Vec<RuleReport>,
    pub duration_ms: u64,
    /// When the run finished.
    pub cleaned_at: DateTime<Utc>,
}

impl CleaningSummary {
    /// Reports for rules that were skipped.
    pub fn skipped_rules(&self) -> impl Iterator<Item = &RuleReport> {
        self.rule_reports.iter().filter(|r| !r.is_applied())
    }
}

/// Output of [`Pipeline::process`](crate::Pipeline::process).
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The cleaned dataset.
    pub data: DataFrame,
    pub summary: CleaningSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_report_constructors() {
        let applied = RuleReport::applied("currency", vec!["Ticket_Price_Rs".to_string()], "parsed", 1);
        assert!(applied.is_applied());
        assert_eq!(applied.missing_after, 1);

        let skipped = RuleReport::skipped("period", "column 'Purchase_Quarter' absent");
        assert!(!skipped.is_applied());
        assert!(skipped.columns.is_empty());
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&RuleOutcome::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");
    }
}

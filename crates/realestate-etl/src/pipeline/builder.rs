//! The cleaning pipeline and its builder.

use crate::config::{ConfigValidationError, EtlConfig};
use crate::error::{EtlError, Result};
use crate::pipeline::progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate};
use crate::rules::{ColumnRule, default_rules};
use crate::types::{CleaningSummary, PipelineResult, RuleReport};
use chrono::Utc;
use polars::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Applies the column rules, in order, to one dataset.
///
/// Use [`Pipeline::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use realestate_etl::{EtlConfig, Pipeline};
///
/// let result = Pipeline::builder()
///     .config(EtlConfig::default())
///     .on_progress(|update| println!("{}", update.message))
///     .build()?
///     .process(df)?;
///
/// println!("{} rows cleaned", result.summary.rows);
/// ```
pub struct Pipeline {
    config: EtlConfig,
    rules: Vec<Box<dyn ColumnRule>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Names of the rules in execution order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule over `df`.
    ///
    /// # Errors
    ///
    /// Fails only on structural problems: a polars operation inside a rule
    /// failing, or a rule changing the row count or dropping columns.
    /// Unparseable values never fail a run.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        match self.process_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(
                    self.rules.len(),
                    "Cleaning completed successfully",
                ));
                Ok(result)
            }
            Err((step, e)) => {
                self.report_progress(ProgressUpdate::failed(
                    step,
                    self.rules.len(),
                    e.to_string(),
                ));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(
        &self,
        mut df: DataFrame,
    ) -> std::result::Result<PipelineResult, (usize, EtlError)> {
        let start_time = Instant::now();
        let total = self.rules.len();
        let rows = df.height();
        let columns_before = df.width();
        let original: HashSet<String> = column_names(&df).into_iter().collect();

        info!("Cleaning {} rows x {} columns", rows, columns_before);
        self.report_progress(ProgressUpdate::started(total, "Starting cleaning pipeline..."));

        let mut rule_reports: Vec<RuleReport> = Vec::with_capacity(total);

        for (index, rule) in self.rules.iter().enumerate() {
            let step = index + 1;
            self.report_progress(ProgressUpdate::rule(
                step,
                total,
                format!("Applying {}", rule.name()),
            ));

            let width_before = df.width();
            let report = rule
                .apply(&mut df)
                .map_err(|e| (step, e.with_context(format!("Rule '{}'", rule.name()))))?;

            if df.height() != rows {
                return Err((
                    step,
                    EtlError::RuleFailed {
                        rule: rule.name().to_string(),
                        reason: format!("row count changed from {} to {}", rows, df.height()),
                    },
                ));
            }
            if df.width() < width_before {
                return Err((
                    step,
                    EtlError::RuleFailed {
                        rule: rule.name().to_string(),
                        reason: format!(
                            "column count dropped from {} to {}",
                            width_before,
                            df.width()
                        ),
                    },
                ));
            }

            debug!("[{}/{}] {}: {}", step, total, rule.name(), report.detail);
            rule_reports.push(report);
        }

        let names = column_names(&df);
        let added_columns: Vec<String> = names
            .iter()
            .filter(|n| !original.contains(n.as_str()))
            .cloned()
            .collect();

        let summary = CleaningSummary {
            rows,
            columns_before,
            columns_after: df.width(),
            added_columns,
            rule_reports,
            duration_ms: start_time.elapsed().as_millis() as u64,
            cleaned_at: Utc::now(),
        };

        info!(
            "Cleaned shape: {} rows x {} columns in {}ms",
            summary.rows, summary.columns_after, summary.duration_ms
        );

        Ok(PipelineResult { data: df, summary })
    }
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<EtlConfig>,
    rules: Option<Vec<Box<dyn ColumnRule>>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: EtlConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default rule set.
    ///
    /// Rules run in the order given.
    pub fn rules(mut self, rules: Vec<Box<dyn ColumnRule>>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let rules = self.rules.unwrap_or_else(|| default_rules(&config));

        Ok(Pipeline {
            config,
            rules,
            progress_reporter: self.progress_reporter,
        })
    }
}

//! End-to-end clean-and-load run.
//!
//! Load the source CSV, clean it, write the cleaned file, then (optionally)
//! replace-load it into a table. The file is always written before the load
//! is attempted, and a failed load never undoes the file or the cleaned data.

use crate::config::EtlConfig;
use crate::error::{EtlError, Result, ResultExt};
use crate::io::{TableSink, cleaned_path, load_csv, write_csv};
use crate::pipeline::Pipeline;
use crate::types::PipelineResult;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

/// Outcome of the table load step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadStatus {
    /// No connection string was given.
    Skipped,
    Loaded { table: String, rows: usize },
    Failed { table: String, reason: String },
}

impl LoadStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct EtlOutcome {
    pub result: PipelineResult,
    pub cleaned_path: PathBuf,
    pub load: LoadStatus,
}

/// One clean-and-load run.
#[derive(Debug, Clone)]
pub struct EtlJob {
    pub csv_path: PathBuf,
    pub db_url: Option<String>,
    pub config: EtlConfig,
}

impl EtlJob {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            db_url: None,
            config: EtlConfig::default(),
        }
    }

    pub fn db_url(mut self, url: impl Into<String>) -> Self {
        self.db_url = Some(url.into());
        self
    }

    pub fn config(mut self, config: EtlConfig) -> Self {
        self.config = config;
        self
    }

    /// Run every step.
    ///
    /// # Errors
    ///
    /// Loading, cleaning and writing the file abort the run. A table load
    /// failure does not: it is logged and returned as [`LoadStatus::Failed`].
    pub async fn run(&self) -> Result<EtlOutcome> {
        let df = load_csv(&self.csv_path)?;

        let pipeline = Pipeline::builder()
            .config(self.config.clone())
            .build()
            .map_err(|e| EtlError::InvalidConfig(e.to_string()))?;
        let mut result = pipeline.process(df).context("Cleaning failed")?;

        let cleaned_path = cleaned_path(&self.csv_path, &self.config.cleaned_file_name);
        write_csv(&mut result.data, &cleaned_path)?;

        let load = match &self.db_url {
            Some(url) => self.load_table(url, &result).await,
            None => {
                info!("No database URL provided, skipping table load");
                LoadStatus::Skipped
            }
        };

        info!("ETL run completed");
        Ok(EtlOutcome {
            result,
            cleaned_path,
            load,
        })
    }

    async fn load_table(&self, url: &str, result: &PipelineResult) -> LoadStatus {
        let table = self.config.table_name.clone();
        let loaded = match TableSink::new(url, self.config.batch_size) {
            Ok(sink) => sink.replace_load(&table, &result.data).await,
            Err(e) => Err(e),
        };

        match loaded {
            Ok(rows) => LoadStatus::Loaded { table, rows },
            Err(e) => {
                error!("Table load into '{}' failed: {}", table, e);
                LoadStatus::Failed {
                    table,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_status_serialization() {
        let json = serde_json::to_string(&LoadStatus::Loaded {
            table: "realestate_clean".to_string(),
            rows: 3,
        })
        .unwrap();
        assert!(json.contains("\"status\":\"loaded\""));
        assert!(json.contains("\"rows\":3"));
        assert!(
            LoadStatus::Failed {
                table: "t".to_string(),
                reason: "x".to_string()
            }
            .is_failed()
        );
    }

    #[tokio::test]
    async fn test_missing_source_aborts() {
        let err = EtlJob::new("/no/such/file.csv").run().await.unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }
}

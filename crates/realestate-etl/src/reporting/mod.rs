//! Run reports.
//!
//! A run report is the [`CleaningSummary`] plus where the data went, written
//! as pretty JSON next to the cleaned file (`--emit-report`).

use crate::error::Result;
use crate::job::LoadStatus;
use crate::types::CleaningSummary;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything worth keeping about one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub source: &'a Path,
    pub cleaned_file: &'a Path,
    pub load: &'a LoadStatus,
    pub summary: &'a CleaningSummary,
}

/// Path of the report for a cleaned file: `<stem>_report.json` beside it.
pub fn report_path(cleaned_file: &Path) -> PathBuf {
    let stem = cleaned_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cleaned".to_string());
    cleaned_file.with_file_name(format!("{stem}_report.json"))
}

/// Write `report` next to its cleaned file and return the report path.
pub fn write_report(report: &RunReport<'_>) -> Result<PathBuf> {
    let path = report_path(report.cleaned_file);
    let mut file = File::create(&path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    info!("Report saved: {}", path.display());
    Ok(path)
}

//! Writing the cleaned dataset to disk.

use crate::error::{EtlError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Path of the cleaned file: `file_name` in the source file's directory,
/// or the current directory when the source path has none.
pub fn cleaned_path(source: &Path, file_name: &str) -> PathBuf {
    match source.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(".").join(file_name),
    }
}

/// Write `df` as CSV with a header row; missing values become empty fields.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let sink_error = |reason: String| EtlError::Sink {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = File::create(path).map_err(|e| sink_error(e.to_string()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .with_null_value(String::new())
        .finish(df)
        .map_err(|e| sink_error(e.to_string()))?;

    info!("Cleaned CSV saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cleaned_path_next_to_source() {
        assert_eq!(
            cleaned_path(Path::new("data/raw/sales.csv"), "out.csv"),
            PathBuf::from("data/raw/out.csv")
        );
        assert_eq!(
            cleaned_path(Path::new("sales.csv"), "out.csv"),
            PathBuf::from("./out.csv")
        );
    }

    #[test]
    fn test_write_csv_empty_fields_for_missing() {
        let dir = std::env::temp_dir().join(format!("realestate_etl_sink_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cleaned.csv");

        let mut df = df![
            "Builder" => [Some("Sobha"), None],
            "Price_per_Sqft" => [Some(1.5), None],
        ]
        .unwrap();
        write_csv(&mut df, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Builder,Price_per_Sqft");
        assert_eq!(lines[1], "Sobha,1.5");
        assert_eq!(lines[2], ",");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let mut df = df!["a" => [1]].unwrap();
        let err = write_csv(&mut df, Path::new("/no/such/dir/out.csv")).unwrap_err();
        assert_eq!(err.error_code(), "SINK_FAILED");
    }
}

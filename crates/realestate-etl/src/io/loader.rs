//! CSV loading.

use crate::error::{EtlError, Result};
use crate::utils::NULL_VALUE_MARKERS;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Rows scanned to infer column types.
pub const INFER_SCHEMA_ROWS: usize = 10_000;

/// Read a CSV file with a header row.
///
/// Column types are inferred from the first [`INFER_SCHEMA_ROWS`] rows. If
/// inference fails (a column that looks numeric turns out not to be further
/// down), every column is read as text instead; the rules coerce what they
/// need.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(EtlError::Load {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }

    info!("Loading CSV: {}", path.display());

    let df = match read_csv(path, INFER_SCHEMA_ROWS) {
        Ok(df) => df,
        Err(e) => {
            warn!("Type inference failed ({}), reading every column as text", e);
            read_csv(path, 0).map_err(|e| EtlError::Load {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        }
    };

    info!("Raw shape: {:?}", df.shape());
    debug!("Columns: {:?}", df.get_column_names());
    Ok(df)
}

fn read_csv(path: &Path, infer_rows: usize) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(
        NULL_VALUE_MARKERS
            .iter()
            .map(|marker| PlSmallStr::from(*marker))
            .collect(),
    );

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_rows))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_csv(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("realestate_etl_loader_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, EtlError::Load { .. }));
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_null_markers_are_missing() {
        let path = temp_csv(
            "markers.csv",
            "Builder,Amenity_Score\nSobha,7.5\nnan,NA\nN/A,\n",
        );
        let df = load_csv(&path).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.column("Builder").unwrap().null_count(), 2);
        assert_eq!(df.column("Amenity_Score").unwrap().null_count(), 2);
        assert_eq!(df.column("Amenity_Score").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_headers_kept_verbatim() {
        let path = temp_csv("headers.csv", " Builder ,Area_Sqft\nA,100\n");
        let df = load_csv(&path).unwrap();
        assert!(df.column(" Builder ").is_ok());
    }
}

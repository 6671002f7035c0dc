//! Shared utilities for the column rules.
//!
//! Small, pure helpers: column presence checks, text rendering of arbitrary
//! columns, title casing and medians.

use polars::prelude::*;

// =============================================================================
// Missing Value Markers
// =============================================================================

/// Literal text some exports write for a missing value.
///
/// Matched case-sensitively by the categorical text rule.
pub const MISSING_MARKER: &str = "nan";

/// Field values the loader reads as missing.
pub const NULL_VALUE_MARKERS: [&str; 9] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

// =============================================================================
// Column Access Utilities
// =============================================================================

/// Check whether a column with this exact name exists.
#[inline]
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Return the first name from `candidates` present in the frame.
pub fn first_present<'a>(df: &DataFrame, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .map(String::as_str)
        .find(|name| has_column(df, name))
}

/// Render a column as text, whatever its dtype.
///
/// Nulls stay null. Numeric columns render the way polars formats them
/// (`1.5`, `12`), which is what the text parsers expect.
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Read a column as `f64`, turning anything non-numeric into null.
pub fn numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df.column(name)?.as_materialized_series();
    let as_float = if series.dtype() == &DataType::String {
        // unparseable text becomes null
        series.str()?.into_iter().map(parse_plain_number).collect::<Vec<_>>()
    } else {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect::<Vec<_>>()
    };
    Ok(as_float
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

fn parse_plain_number(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

// =============================================================================
// Text Utilities
// =============================================================================

/// Collapse internal whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case a string.
///
/// A letter is upper-cased when it follows a non-letter (or starts the
/// string) and lower-cased otherwise, so `"2bhk"` becomes `"2Bhk"` and
/// `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Median of the given values; `None` when empty.
///
/// Even-length inputs average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median of the present values in a column of optionals.
pub fn median_of_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    median(&present)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  prestige   group \t"), "prestige group");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("prestige group"), "Prestige Group");
        assert_eq!(title_case("WHITEFIELD"), "Whitefield");
        assert_eq!(title_case("3bhk"), "3Bhk");
        assert_eq!(title_case("under-construction"), "Under-Construction");
        assert_eq!(title_case("o'neil"), "O'Neil");
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[10.0, 30.0]), Some(20.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_of_present() {
        assert_eq!(median_of_present(&[Some(10.0), None, Some(30.0)]), Some(20.0));
        assert_eq!(median_of_present(&[None, None]), None);
    }

    #[test]
    fn test_has_column_and_first_present() {
        let df = df![
            "Area_Sqft" => [1200.0],
            "Super_Builtup_Sqft" => [1500.0],
        ]
        .unwrap();
        let aliases = vec![
            "Carpet_Area_Sqft".to_string(),
            "Area_Sqft".to_string(),
            "Super_Builtup_Sqft".to_string(),
        ];
        assert!(has_column(&df, "Area_Sqft"));
        assert!(!has_column(&df, "Carpet_Area_Sqft"));
        assert_eq!(first_present(&df, &aliases), Some("Area_Sqft"));
    }

    #[test]
    fn test_text_values_from_numeric_column() {
        let df = df!["status" => [Some(1i64), None]].unwrap();
        let values = text_values(&df, "status").unwrap();
        assert_eq!(values, vec![Some("1".to_string()), None]);
    }

    #[test]
    fn test_numeric_values_coerces_text() {
        let df = df!["area" => [Some("1200"), Some("n/a"), None, Some(" 950.5 ")]].unwrap();
        let values = numeric_values(&df, "area").unwrap();
        assert_eq!(values, vec![Some(1200.0), None, None, Some(950.5)]);
    }
}

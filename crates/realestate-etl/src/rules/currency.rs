//! Mixed-unit currency parsing.
//!
//! Prices arrive as free text: bare rupee amounts (`"3,50,000"`), crores
//! (`"₹1.5 Cr"`) or lakhs (`"12 Lakh"`, `"12 lac"`). Everything is converted
//! to rupees as `f64`; text that cannot be read becomes null.

use super::{ColumnRule, missing_in};
use crate::error::Result;
use crate::types::RuleReport;
use crate::utils::{has_column, numeric_values, text_values};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

const RUPEES_PER_CRORE: f64 = 1e7;
const RUPEES_PER_LAKH: f64 = 1e5;

static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d.]").expect("Invalid regex: non-numeric"));
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d.]+").expect("Invalid regex: leading number"));

/// Parse a raw price into rupees.
///
/// Returns `None` for anything that does not yield a number.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let s = raw.trim().to_lowercase().replace(['₹', ','], "");

    if s.contains("cr") {
        let rest = s.replace("cr", "");
        let number = LEADING_NUMBER.find(rest.trim())?;
        return parse_number(number.as_str()).map(|n| n * RUPEES_PER_CRORE);
    }

    if s.contains("lakh") || s.contains("lac") {
        return parse_number(&NON_NUMERIC.replace_all(&s, "")).map(|n| n * RUPEES_PER_LAKH);
    }

    parse_number(&NON_NUMERIC.replace_all(&s, ""))
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Writes the rupee price column from the raw price column.
pub struct CurrencyParser {
    source: String,
    output: String,
}

impl CurrencyParser {
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

impl ColumnRule for CurrencyParser {
    fn name(&self) -> &'static str {
        "currency"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        let rows = df.height();

        let (series, detail) = if has_column(df, &self.source) {
            let is_text = df.column(&self.source)?.dtype() == &DataType::String;
            let parsed: Vec<Option<f64>> = if is_text {
                text_values(df, &self.source)?
                    .iter()
                    .map(|v| v.as_deref().and_then(parse_currency))
                    .collect()
            } else {
                // already rupees; polars renders large floats as "1e16"
                numeric_values(df, &self.source)?
            };
            let series = Series::new(self.output.as_str().into(), parsed);
            (series, format!("Parsed '{}' into rupees", self.source))
        } else {
            debug!("Price column '{}' absent, writing null prices", self.source);
            let series = Series::full_null(self.output.as_str().into(), rows, &DataType::Float64);
            (series, format!("'{}' absent, prices left missing", self.source))
        };

        df.with_column(series)?;
        let missing = missing_in(df, &[self.output.as_str()]);
        debug!(
            "Currency rule wrote '{}' ({} missing of {})",
            self.output, missing, rows
        );
        Ok(RuleReport::applied(
            self.name(),
            vec![self.output.clone()],
            detail,
            missing,
        ))
    }
}

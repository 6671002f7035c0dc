//! Purchase period parsing.
//!
//! The period column holds either an explicit quarter label (`"Q3 2024"`,
//! `"q1-2023"`) or something that reads as a calendar date. Both resolve to
//! a year and a quarter number; anything else resolves to neither.

use super::{ColumnRule, missing_in};
use crate::error::Result;
use crate::types::RuleReport;
use crate::utils::{has_column, text_values};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

static QUARTER_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)q([1-4])[^\d]*(\d{4})").expect("Invalid regex: quarter label"));
static YEAR_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}$").expect("Invalid regex: year only"));
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}[-/]\d{1,2}$").expect("Invalid regex: year-month"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// Month-first before day-first when both would parse.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%B-%Y",
    "%Y %B %d",
];

// Tried after prefixing the text with a day of 1.
const MONTH_YEAR_FORMATS: &[&str] = &["%d %B %Y", "%d %B, %Y", "%d-%B-%Y", "%d %m/%Y"];

/// A purchase year and its quarter (1 to 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchasePeriod {
    pub year: i32,
    pub quarter: i32,
}

impl PurchasePeriod {
    fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month() as i32 - 1) / 3 + 1,
        }
    }
}

/// Parse a purchase period from free text.
///
/// An explicit quarter label wins over date parsing. Returns `None` when
/// neither matches; year and quarter are never guessed separately.
pub fn parse_purchase_period(raw: &str) -> Option<PurchasePeriod> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = QUARTER_LABEL.captures(s) {
        let quarter = caps[1].parse().ok()?;
        let year = caps[2].parse().ok()?;
        return Some(PurchasePeriod { year, quarter });
    }

    parse_calendar_date(s).map(PurchasePeriod::from_date)
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if YEAR_ONLY.is_match(s) {
        return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
    }

    if YEAR_MONTH.is_match(s) {
        let normalized = s.replace('/', "-");
        return NaiveDate::parse_from_str(&format!("{normalized}-01"), "%Y-%m-%d").ok();
    }

    if let Some(dt) = DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
        .filter(has_full_year)
    {
        return Some(dt);
    }

    if let Some(date) = DATETIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .map(|dt| dt.date())
            .filter(has_full_year)
    }) {
        return Some(date);
    }

    if let Some(date) = DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .filter(has_full_year)
    }) {
        return Some(date);
    }

    let with_day = format!("1 {s}");
    let with_dash = format!("1-{s}");
    MONTH_YEAR_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&with_day, fmt)
            .or_else(|_| NaiveDate::parse_from_str(&with_dash, fmt))
            .ok()
            .filter(has_full_year)
    })
}

// chrono's %Y takes any digit run, so "Nov 2023" parses as %B %d %Y with
// day 20 and year 23 unless short years are rejected.
fn has_full_year(date: &NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

/// Splits the purchase period column into `Int32` year and quarter columns.
///
/// Writes nothing when the period column is absent.
pub struct PurchasePeriodParser {
    source: String,
    year_column: String,
    quarter_column: String,
}

impl PurchasePeriodParser {
    pub fn new(
        source: impl Into<String>,
        year_column: impl Into<String>,
        quarter_column: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            year_column: year_column.into(),
            quarter_column: quarter_column.into(),
        }
    }
}

impl ColumnRule for PurchasePeriodParser {
    fn name(&self) -> &'static str {
        "purchase_period"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        if !has_column(df, &self.source) {
            debug!("Period column '{}' absent, skipping", self.source);
            return Ok(RuleReport::skipped(
                self.name(),
                format!("'{}' absent", self.source),
            ));
        }

        let periods: Vec<Option<PurchasePeriod>> = text_values(df, &self.source)?
            .iter()
            .map(|v| v.as_deref().and_then(parse_purchase_period))
            .collect();

        let years: Vec<Option<i32>> = periods.iter().map(|p| p.map(|p| p.year)).collect();
        let quarters: Vec<Option<i32>> = periods.iter().map(|p| p.map(|p| p.quarter)).collect();
        df.with_column(Series::new(self.year_column.as_str().into(), years))?;
        df.with_column(Series::new(self.quarter_column.as_str().into(), quarters))?;

        let unparsed = missing_in(df, &[self.year_column.as_str()]);
        debug!(
            "Parsed '{}' into year/quarter ({} unparsed)",
            self.source, unparsed
        );
        Ok(RuleReport::applied(
            self.name(),
            vec![self.year_column.clone(), self.quarter_column.clone()],
            format!("Parsed '{}' into year and quarter", self.source),
            unparsed * 2,
        ))
    }
}

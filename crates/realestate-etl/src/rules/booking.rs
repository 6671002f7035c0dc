//! Booking flag derivation.

use super::ColumnRule;
use crate::error::Result;
use crate::types::RuleReport;
use crate::utils::{has_column, text_values};
use polars::prelude::*;
use tracing::debug;

/// Status values that mean the unit was booked.
pub const AFFIRMATIVE_STATUSES: [&str; 5] = ["booked", "confirmed", "yes", "true", "1"];

/// 1 for an affirmative booking status, 0 for anything else (missing included).
pub fn booking_flag(status: Option<&str>) -> i32 {
    match status {
        Some(s) => {
            let s = s.trim().to_lowercase();
            i32::from(AFFIRMATIVE_STATUSES.contains(&s.as_str()))
        }
        None => 0,
    }
}

/// Writes an `Int32` 0/1 booking flag.
///
/// When the status column does not exist the flag column is entirely null.
pub struct BookingFlagDeriver {
    source: String,
    output: String,
}

impl BookingFlagDeriver {
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

impl ColumnRule for BookingFlagDeriver {
    fn name(&self) -> &'static str {
        "booking_flag"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        let rows = df.height();
        let name: PlSmallStr = self.output.as_str().into();

        if !has_column(df, &self.source) {
            debug!("Booking column '{}' absent, flag left missing", self.source);
            df.with_column(Series::full_null(name, rows, &DataType::Int32))?;
            return Ok(RuleReport::applied(
                self.name(),
                vec![self.output.clone()],
                format!("'{}' absent, flag left missing", self.source),
                rows,
            ));
        }

        let flags: Vec<i32> = text_values(df, &self.source)?
            .iter()
            .map(|v| booking_flag(v.as_deref()))
            .collect();
        let booked = flags.iter().filter(|&&f| f == 1).count();
        df.with_column(Series::new(name, flags))?;

        debug!("Flagged {} of {} rows as booked", booked, rows);
        Ok(RuleReport::applied(
            self.name(),
            vec![self.output.clone()],
            format!("{} of {} rows booked", booked, rows),
            0,
        ))
    }
}

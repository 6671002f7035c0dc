//! Processing timestamp.

use super::ColumnRule;
use crate::error::Result;
use crate::types::RuleReport;
use chrono::{NaiveDateTime, Utc};
use polars::prelude::*;
use tracing::debug;

/// Appends a `Datetime[μs]` column holding one UTC instant for every row.
///
/// The instant is captured when the rule runs unless one is pinned with
/// [`TimestampStamper::at`].
pub struct TimestampStamper {
    output: String,
    fixed: Option<NaiveDateTime>,
}

impl TimestampStamper {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            fixed: None,
        }
    }

    /// Stamp a fixed instant instead of the current time.
    pub fn at(mut self, instant: NaiveDateTime) -> Self {
        self.fixed = Some(instant);
        self
    }
}

impl ColumnRule for TimestampStamper {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        let instant = self.fixed.unwrap_or_else(|| Utc::now().naive_utc());
        let micros = instant.and_utc().timestamp_micros();

        let stamped = Series::new(self.output.as_str().into(), vec![micros; df.height()])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
        df.with_column(stamped)?;

        debug!("Stamped '{}' with {}", self.output, instant);
        Ok(RuleReport::applied(
            self.name(),
            vec![self.output.clone()],
            format!("Stamped {} UTC", instant.format("%Y-%m-%d %H:%M:%S")),
            0,
        ))
    }
}

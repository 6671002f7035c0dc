//! Column rules for cleaning a real-estate sales dataset.
//!
//! Each rule reads zero or more input columns and writes or mutates its own
//! output column(s). Rules are applied one after another over the whole
//! frame; every rule produces exactly one output value per input row and
//! preserves row order.
//!
//! The fixed order is:
//! 1. [`HeaderNormalizer`] - trim column names
//! 2. [`CategoricalNormalizer`] - title-case categorical text
//! 3. [`CurrencyParser`] - mixed-unit prices to rupees
//! 4. [`PricePerAreaDeriver`] - price / area
//! 5. [`GroupedMedianImputer`](crate::imputers::GroupedMedianImputer) - amenity score
//! 6. [`BookingFlagDeriver`] - 0/1 booking flag
//! 7. [`PurchasePeriodParser`] - year and quarter
//! 8. [`SentimentScorer`] - keyword sentiment
//! 9. [`TimestampStamper`] - processing time

mod booking;
mod currency;
mod headers;
mod period;
mod price_per_area;
mod sentiment;
mod text;
mod timestamp;

pub use booking::{AFFIRMATIVE_STATUSES, BookingFlagDeriver, booking_flag};
pub use currency::{CurrencyParser, parse_currency};
pub use headers::HeaderNormalizer;
pub use period::{PurchasePeriod, PurchasePeriodParser, parse_purchase_period};
pub use price_per_area::{PricePerAreaDeriver, price_per_area};
pub use sentiment::{NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS, SentimentScorer, sentiment_score};
pub use text::{CategoricalNormalizer, normalize_category};
pub use timestamp::TimestampStamper;

use crate::config::EtlConfig;
use crate::error::Result;
use crate::imputers::GroupedMedianImputer;
use crate::types::RuleReport;
use polars::prelude::*;

/// A single cleaning or derivation step over the whole dataset.
///
/// Implementations must keep the row count unchanged and must never remove
/// columns. Value-level parse failures become nulls; only structural
/// problems (a polars operation failing) are returned as errors.
pub trait ColumnRule: Send + Sync {
    /// Short rule name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Apply the rule in place.
    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport>;
}

/// Build the rule set in its fixed execution order.
pub fn default_rules(config: &EtlConfig) -> Vec<Box<dyn ColumnRule>> {
    vec![
        Box::new(HeaderNormalizer),
        Box::new(CategoricalNormalizer::new(config.categorical_columns.clone())),
        Box::new(CurrencyParser::new(
            &config.price_column,
            &config.price_output_column,
        )),
        Box::new(PricePerAreaDeriver::new(
            &config.price_output_column,
            config.area_columns.clone(),
            &config.price_per_area_column,
        )),
        Box::new(GroupedMedianImputer::new(
            &config.amenity_column,
            &config.amenity_group_column,
        )),
        Box::new(BookingFlagDeriver::new(
            &config.booking_column,
            &config.booking_flag_column,
        )),
        Box::new(PurchasePeriodParser::new(
            &config.period_column,
            &config.year_column,
            &config.quarter_column,
        )),
        Box::new(SentimentScorer::new(
            &config.comments_column,
            &config.sentiment_column,
        )),
        Box::new(TimestampStamper::new(&config.timestamp_column)),
    ]
}

/// Total nulls across the named columns (absent columns count as zero).
pub(crate) fn missing_in(df: &DataFrame, columns: &[&str]) -> usize {
    columns
        .iter()
        .filter_map(|name| df.column(name).ok())
        .map(|col| col.null_count())
        .sum()
}

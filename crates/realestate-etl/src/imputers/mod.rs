//! Imputation of missing numeric values.
//!
//! Currently one strategy: group-aware median imputation with a global
//! median fallback, used for the amenity score.

mod grouped;

pub use grouped::{GroupedMedianImputer, impute_grouped_median};

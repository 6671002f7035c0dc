//! Price per unit area.

use super::{ColumnRule, missing_in};
use crate::error::Result;
use crate::types::RuleReport;
use crate::utils::{first_present, numeric_values};
use polars::prelude::*;
use tracing::debug;

/// Divide a price by an area.
///
/// Missing when either side is missing, the area is not positive or the
/// quotient is not finite.
pub fn price_per_area(price: Option<f64>, area: Option<f64>) -> Option<f64> {
    match (price, area) {
        (Some(p), Some(a)) if a > 0.0 => Some(p / a).filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Derives the price-per-area column from the rupee price and the first
/// area alias present.
///
/// The chosen area column is converted to `Float64` in place.
pub struct PricePerAreaDeriver {
    price_column: String,
    area_columns: Vec<String>,
    output: String,
}

impl PricePerAreaDeriver {
    pub fn new(
        price_column: impl Into<String>,
        area_columns: Vec<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            price_column: price_column.into(),
            area_columns,
            output: output.into(),
        }
    }
}

impl ColumnRule for PricePerAreaDeriver {
    fn name(&self) -> &'static str {
        "price_per_area"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        let rows = df.height();
        let output_name: PlSmallStr = self.output.as_str().into();

        let Some(area_column) = first_present(df, &self.area_columns).map(str::to_string) else {
            debug!("No area column present, writing null '{}'", self.output);
            df.with_column(Series::full_null(output_name, rows, &DataType::Float64))?;
            return Ok(RuleReport::applied(
                self.name(),
                vec![self.output.clone()],
                "No area column present, ratio left missing",
                rows,
            ));
        };

        let areas = numeric_values(df, &area_column)?;
        df.replace(
            &area_column,
            Series::new(area_column.as_str().into(), areas.clone()),
        )?;

        let prices = match df.column(&self.price_column) {
            Ok(_) => numeric_values(df, &self.price_column)?,
            Err(_) => vec![None; rows],
        };

        let ratios: Vec<Option<f64>> = prices
            .into_iter()
            .zip(areas)
            .map(|(price, area)| price_per_area(price, area))
            .collect();
        df.with_column(Series::new(output_name, ratios))?;

        let missing = missing_in(df, &[self.output.as_str()]);
        debug!(
            "Derived '{}' from '{}' / '{}' ({} missing)",
            self.output, self.price_column, area_column, missing
        );
        Ok(RuleReport::applied(
            self.name(),
            vec![area_column.clone(), self.output.clone()],
            format!("Divided '{}' by '{}'", self.price_column, area_column),
            missing,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deriver() -> PricePerAreaDeriver {
        PricePerAreaDeriver::new(
            "Ticket_Price_Rs",
            vec![
                "Carpet_Area_Sqft".to_string(),
                "Area_Sqft".to_string(),
                "Super_Builtup_Sqft".to_string(),
            ],
            "Price_per_Sqft",
        )
    }

    #[test]
    fn test_price_per_area() {
        assert_eq!(price_per_area(Some(1000.0), Some(10.0)), Some(100.0));
        assert_eq!(price_per_area(None, Some(10.0)), None);
        assert_eq!(price_per_area(Some(1000.0), None), None);
        assert_eq!(price_per_area(Some(1000.0), Some(0.0)), None);
        assert_eq!(price_per_area(Some(1000.0), Some(-5.0)), None);
    }

    #[test]
    fn test_uses_first_present_alias() {
        let mut df = df![
            "Ticket_Price_Rs" => [Some(15_000_000.0), Some(9_000_000.0), None],
            "Area_Sqft" => [Some("1500"), Some("oops"), Some("900")],
            "Super_Builtup_Sqft" => [Some(2000.0), Some(2000.0), Some(2000.0)],
        ]
        .unwrap();

        let report = deriver().apply(&mut df).unwrap();

        let area = df.column("Area_Sqft").unwrap();
        assert_eq!(area.dtype(), &DataType::Float64);
        assert!(matches!(area.get(1).unwrap(), AnyValue::Null));

        let ratio = df.column("Price_per_Sqft").unwrap();
        assert_eq!(ratio.get(0).unwrap().try_extract::<f64>().unwrap(), 10_000.0);
        assert!(matches!(ratio.get(1).unwrap(), AnyValue::Null));
        assert!(matches!(ratio.get(2).unwrap(), AnyValue::Null));
        assert_eq!(report.missing_after, 2);
        assert_eq!(report.columns[0], "Area_Sqft");
    }

    #[test]
    fn test_zero_area_is_missing() {
        let mut df = df![
            "Ticket_Price_Rs" => [Some(1_000_000.0)],
            "Carpet_Area_Sqft" => [Some(0.0)],
        ]
        .unwrap();
        deriver().apply(&mut df).unwrap();
        assert_eq!(df.column("Price_per_Sqft").unwrap().null_count(), 1);
    }

    #[test]
    fn test_no_area_alias_writes_all_missing() {
        let mut df = df!["Ticket_Price_Rs" => [Some(1.0), Some(2.0)]].unwrap();
        deriver().apply(&mut df).unwrap();
        let col = df.column("Price_per_Sqft").unwrap();
        assert_eq!(col.dtype(), &DataType::Float64);
        assert_eq!(col.null_count(), 2);
    }
}

//! Configuration types for the cleaning pipeline and its sinks.
//!
//! Every column name the rules read or write lives here, with defaults that
//! match the real-estate sales export. Use [`EtlConfig::builder()`] for a
//! validated configuration, or deserialize one from JSON (missing fields fall
//! back to their defaults).

use serde::{Deserialize, Serialize};

/// Default categorical columns normalized to title case.
pub const DEFAULT_CATEGORICAL_COLUMNS: [&str; 7] = [
    "Builder",
    "Micro_Market",
    "Configuration",
    "Sales_Channel",
    "Buyer_Type",
    "Possession_Status",
    "Booking_Status",
];

/// Default area column aliases, in priority order.
pub const DEFAULT_AREA_COLUMNS: [&str; 4] = [
    "Carpet_Area_Sqft",
    "Area_Sqft",
    "Super_Builtup_Sqft",
    "Area_Sq.Ft",
];

/// File name of the cleaned CSV written next to the source file.
pub const DEFAULT_CLEANED_FILE_NAME: &str = "realestate_cleaned_final.csv";

/// Default destination table.
pub const DEFAULT_TABLE_NAME: &str = "realestate_clean";

/// Default number of rows per load transaction.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Configuration for the cleaning pipeline and its sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Columns normalized by the categorical text rule (skipped when absent).
    pub categorical_columns: Vec<String>,

    /// Raw mixed-unit price column.
    /// Default: "Ticket_Price_Cr"
    pub price_column: String,

    /// Canonical rupee price column produced by the currency rule.
    /// Default: "Ticket_Price_Rs"
    pub price_output_column: String,

    /// Area column aliases; the first one present is used.
    pub area_columns: Vec<String>,

    /// Price per unit area output column.
    /// Default: "Price_per_Sqft"
    pub price_per_area_column: String,

    /// Numeric column imputed with grouped medians.
    /// Default: "Amenity_Score"
    pub amenity_column: String,

    /// Grouping column for amenity imputation.
    /// Default: "Micro_Market"
    pub amenity_group_column: String,

    /// Raw booking status column.
    /// Default: "Booking_Status"
    pub booking_column: String,

    /// 0/1 booking flag output column.
    /// Default: "Booking_Flag"
    pub booking_flag_column: String,

    /// Free-text purchase period column.
    /// Default: "Purchase_Quarter"
    pub period_column: String,

    /// Purchase year output column.
    /// Default: "Purchase_Year"
    pub year_column: String,

    /// Quarter number output column.
    /// Default: "Quarter_Number"
    pub quarter_column: String,

    /// Free-text buyer comments column.
    /// Default: "Buyer_Comments"
    pub comments_column: String,

    /// Sentiment score output column.
    /// Default: "Buyer_Comment_Sentiment"
    pub sentiment_column: String,

    /// Processing timestamp output column.
    /// Default: "Data_Cleaned_Timestamp"
    pub timestamp_column: String,

    /// File name of the cleaned CSV, written in the source file's directory.
    pub cleaned_file_name: String,

    /// Destination table for the replace-load.
    pub table_name: String,

    /// Maximum rows per load transaction.
    pub batch_size: usize,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            categorical_columns: DEFAULT_CATEGORICAL_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            price_column: "Ticket_Price_Cr".to_string(),
            price_output_column: "Ticket_Price_Rs".to_string(),
            area_columns: DEFAULT_AREA_COLUMNS.iter().map(|s| s.to_string()).collect(),
            price_per_area_column: "Price_per_Sqft".to_string(),
            amenity_column: "Amenity_Score".to_string(),
            amenity_group_column: "Micro_Market".to_string(),
            booking_column: "Booking_Status".to_string(),
            booking_flag_column: "Booking_Flag".to_string(),
            period_column: "Purchase_Quarter".to_string(),
            year_column: "Purchase_Year".to_string(),
            quarter_column: "Quarter_Number".to_string(),
            comments_column: "Buyer_Comments".to_string(),
            sentiment_column: "Buyer_Comment_Sentiment".to_string(),
            timestamp_column: "Data_Cleaned_Timestamp".to_string(),
            cleaned_file_name: DEFAULT_CLEANED_FILE_NAME.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl EtlConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EtlConfigBuilder {
        EtlConfigBuilder::default()
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let config: EtlConfig = serde_json::from_str(json)?;
        config
            .validate()
            .map_err(|e| crate::error::EtlError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let named = [
            ("price_column", &self.price_column),
            ("price_output_column", &self.price_output_column),
            ("price_per_area_column", &self.price_per_area_column),
            ("amenity_column", &self.amenity_column),
            ("amenity_group_column", &self.amenity_group_column),
            ("booking_column", &self.booking_column),
            ("booking_flag_column", &self.booking_flag_column),
            ("period_column", &self.period_column),
            ("year_column", &self.year_column),
            ("quarter_column", &self.quarter_column),
            ("comments_column", &self.comments_column),
            ("sentiment_column", &self.sentiment_column),
            ("timestamp_column", &self.timestamp_column),
            ("cleaned_file_name", &self.cleaned_file_name),
            ("table_name", &self.table_name),
        ];
        for (field, value) in named {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyName(field.to_string()));
            }
        }

        if self.categorical_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyName(
                "categorical_columns".to_string(),
            ));
        }

        if self.area_columns.is_empty() || self.area_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigValidationError::NoAreaColumns);
        }

        if self.batch_size == 0 {
            return Err(ConfigValidationError::InvalidBatchSize(self.batch_size));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{0}': name must not be empty")]
    EmptyName(String),

    #[error("At least one non-empty area column alias is required")]
    NoAreaColumns,

    #[error("Invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),
}

/// Builder for [`EtlConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EtlConfigBuilder {
    categorical_columns: Option<Vec<String>>,
    price_column: Option<String>,
    area_columns: Option<Vec<String>>,
    amenity_column: Option<String>,
    amenity_group_column: Option<String>,
    booking_column: Option<String>,
    period_column: Option<String>,
    comments_column: Option<String>,
    cleaned_file_name: Option<String>,
    table_name: Option<String>,
    batch_size: Option<usize>,
}

impl EtlConfigBuilder {
    /// Replace the set of categorical columns to normalize.
    pub fn categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the raw price column.
    pub fn price_column(mut self, column: impl Into<String>) -> Self {
        self.price_column = Some(column.into());
        self
    }

    /// Replace the area column aliases (priority order).
    pub fn area_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.area_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the amenity score column.
    pub fn amenity_column(mut self, column: impl Into<String>) -> Self {
        self.amenity_column = Some(column.into());
        self
    }

    /// Set the grouping column used for amenity imputation.
    pub fn amenity_group_column(mut self, column: impl Into<String>) -> Self {
        self.amenity_group_column = Some(column.into());
        self
    }

    /// Set the booking status column.
    pub fn booking_column(mut self, column: impl Into<String>) -> Self {
        self.booking_column = Some(column.into());
        self
    }

    /// Set the purchase period column.
    pub fn period_column(mut self, column: impl Into<String>) -> Self {
        self.period_column = Some(column.into());
        self
    }

    /// Set the buyer comments column.
    pub fn comments_column(mut self, column: impl Into<String>) -> Self {
        self.comments_column = Some(column.into());
        self
    }

    /// Set the file name of the cleaned CSV.
    pub fn cleaned_file_name(mut self, name: impl Into<String>) -> Self {
        self.cleaned_file_name = Some(name.into());
        self
    }

    /// Set the destination table name.
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Set the number of rows per load transaction.
    pub fn batch_size(mut self, rows: usize) -> Self {
        self.batch_size = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EtlConfig` or an error if validation fails.
    pub fn build(self) -> Result<EtlConfig, ConfigValidationError> {
        let defaults = EtlConfig::default();
        let config = EtlConfig {
            categorical_columns: self
                .categorical_columns
                .unwrap_or(defaults.categorical_columns),
            price_column: self.price_column.unwrap_or(defaults.price_column),
            area_columns: self.area_columns.unwrap_or(defaults.area_columns),
            amenity_column: self.amenity_column.unwrap_or(defaults.amenity_column),
            amenity_group_column: self
                .amenity_group_column
                .unwrap_or(defaults.amenity_group_column),
            booking_column: self.booking_column.unwrap_or(defaults.booking_column),
            period_column: self.period_column.unwrap_or(defaults.period_column),
            comments_column: self.comments_column.unwrap_or(defaults.comments_column),
            cleaned_file_name: self
                .cleaned_file_name
                .unwrap_or(defaults.cleaned_file_name),
            table_name: self.table_name.unwrap_or(defaults.table_name),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EtlConfig::default();
        assert_eq!(config.categorical_columns.len(), 7);
        assert_eq!(config.area_columns[0], "Carpet_Area_Sqft");
        assert_eq!(config.cleaned_file_name, "realestate_cleaned_final.csv");
        assert_eq!(config.table_name, "realestate_clean");
        assert_eq!(config.batch_size, 5000);
    }

    #[test]
    fn test_builder_defaults() {
        let config = EtlConfig::builder().build().unwrap();
        assert_eq!(config, EtlConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = EtlConfig::builder()
            .table_name("sales_2024")
            .batch_size(1000)
            .area_columns(["Area_Sqft"])
            .categorical_columns(["Builder"])
            .build()
            .unwrap();

        assert_eq!(config.table_name, "sales_2024");
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.area_columns, vec!["Area_Sqft".to_string()]);
        assert_eq!(config.categorical_columns, vec!["Builder".to_string()]);
        // untouched fields keep their defaults
        assert_eq!(config.price_column, "Ticket_Price_Cr");
    }

    #[test]
    fn test_validation_zero_batch_size() {
        let result = EtlConfig::builder().batch_size(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidBatchSize(0)
        ));
    }

    #[test]
    fn test_validation_empty_table_name() {
        let result = EtlConfig::builder().table_name("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyName(field) if field == "table_name"
        ));
    }

    #[test]
    fn test_validation_no_area_columns() {
        let result = EtlConfig::builder()
            .area_columns(Vec::<String>::new())
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NoAreaColumns
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "table_name": "luxury_sales",
            "batch_size": 250,
            "area_columns": ["Super_Builtup_Sqft"]
        }"#;

        let config = EtlConfig::from_json(json).expect("Should deserialize partial JSON");

        assert_eq!(config.table_name, "luxury_sales");
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.area_columns, vec!["Super_Builtup_Sqft".to_string()]);
        assert_eq!(config.amenity_column, "Amenity_Score");
    }

    #[test]
    fn test_config_from_invalid_json_value() {
        let result = EtlConfig::from_json(r#"{ "batch_size": 0 }"#);
        assert!(matches!(
            result.unwrap_err(),
            crate::error::EtlError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = EtlConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EtlConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}

//! Error types for the cleaning pipeline and its collaborators.
//!
//! Parse failures inside the column rules never surface here: they are
//! downgraded to missing values by the rules themselves. The variants below
//! cover the conditions that do stop a step (bad configuration, unreadable
//! source files, failed writes and failed table loads).
//!
//! Errors serialize as `{ "code": ..., "message": ... }` so run reports can
//! embed them.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the ETL crate.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A column rule could not complete.
    #[error("Rule '{rule}' failed: {reason}")]
    RuleFailed { rule: String, reason: String },

    /// The source file could not be read into a dataset.
    #[error("Failed to load '{}': {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// The cleaned dataset could not be written.
    #[error("Failed to write '{}': {reason}", .path.display())]
    Sink { path: PathBuf, reason: String },

    /// The table load failed.
    #[error("Failed to load table '{table}': {reason}")]
    Database { table: String, reason: String },

    /// Connection string names a backend this crate cannot talk to.
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedDatabase(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EtlError>,
    },
}

impl EtlError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EtlError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::RuleFailed { .. } => "RULE_FAILED",
            Self::Load { .. } => "LOAD_FAILED",
            Self::Sink { .. } => "SINK_FAILED",
            Self::Database { .. } => "DATABASE_LOAD_FAILED",
            Self::UnsupportedDatabase(_) => "UNSUPPORTED_DATABASE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the table load step.
    ///
    /// Load-step failures leave the cleaned dataset and the written file intact.
    pub fn is_load_failure(&self) -> bool {
        match self {
            Self::Database { .. } | Self::UnsupportedDatabase(_) => true,
            Self::WithContext { source, .. } => source.is_load_failure(),
            _ => false,
        }
    }
}

impl Serialize for EtlError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EtlError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for ETL operations.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EtlError::InvalidConfig("batch_size must be positive".to_string()).error_code(),
            "INVALID_CONFIG"
        );
        assert_eq!(
            EtlError::Database {
                table: "realestate_clean".to_string(),
                reason: "refused".to_string(),
            }
            .error_code(),
            "DATABASE_LOAD_FAILED"
        );
    }

    #[test]
    fn test_database_error_names_table_and_cause() {
        let error = EtlError::Database {
            table: "realestate_clean".to_string(),
            reason: "connection refused".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("realestate_clean"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_is_load_failure() {
        assert!(EtlError::UnsupportedDatabase("oracle".to_string()).is_load_failure());
        assert!(
            EtlError::Database {
                table: "t".to_string(),
                reason: "x".to_string(),
            }
            .with_context("During load")
            .is_load_failure()
        );
        assert!(!EtlError::InvalidConfig("x".to_string()).is_load_failure());
    }

    #[test]
    fn test_error_serialization() {
        let error = EtlError::RuleFailed {
            rule: "amenity_imputation".to_string(),
            reason: "row count changed".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("RULE_FAILED"));
        assert!(json.contains("amenity_imputation"));
    }

    #[test]
    fn test_with_context() {
        let error = EtlError::UnsupportedDatabase("oracle".to_string()).with_context("During load");
        assert!(error.to_string().contains("During load"));
        assert_eq!(error.error_code(), "UNSUPPORTED_DATABASE");
    }
}

//! Error types for fraud_eda

use thiserror::Error;

/// Main error type for the analysis pipeline
#[derive(Error, Debug)]
pub enum EdaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Unsupported type {dtype} for column '{column}'")]
    UnsupportedType { column: String, dtype: String },

    #[error("Null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },

    #[error("Invalid timestamp '{value}' in column '{column}' at row {row}")]
    InvalidTimestamp {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid boolean flag '{value}' in column '{column}' at row {row}")]
    InvalidFlag {
        column: String,
        row: usize,
        value: String,
    },

    #[error(
        "Join cardinality violated: exchange key ({date}, {currency}) matches {matches} rate rows, expected at most one"
    )]
    JoinCardinality {
        date: chrono::NaiveDate,
        currency: String,
        matches: usize,
    },

    #[error("Duplicate key ({date}, {currency}) while widening exchange table")]
    DuplicateKey {
        date: chrono::NaiveDate,
        currency: String,
    },

    #[error("Column length mismatch: '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for fraud_eda operations
pub type Result<T> = std::result::Result<T, EdaError>;

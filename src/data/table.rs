//! The enriched transaction frame
//!
//! Normalized transactions plus the joined `rate_to_usd` and the derived
//! `amount_usd`, held as one polars `DataFrame`.

use super::columns::column;
use crate::error::Result;
use crate::types::{Percentage, AMOUNT_USD_COLUMN, RATE_COLUMN};
use polars::prelude::*;

const TABLE: &str = "enriched transactions";

/// Columns the report reads
const REQUIRED_COLUMNS: [&str; 8] = [
    "amount",
    "is_fraud",
    "hour",
    "day_of_week",
    "ip_address",
    "device",
    RATE_COLUMN,
    AMOUNT_USD_COLUMN,
];

/// Transactions joined with same-day exchange rates
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    frame: DataFrame,
}

impl EnrichedTable {
    /// Wrap a joined frame, checking the report columns are present
    pub fn new(frame: DataFrame) -> Result<Self> {
        for name in REQUIRED_COLUMNS {
            column(&frame, TABLE, name)?;
        }
        Ok(Self { frame })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Share of fraudulent rows, `None` for an empty table
    pub fn fraud_rate(&self) -> Result<Option<Percentage>> {
        let flags = self.frame.column("is_fraud")?.cast(&DataType::Float64)?;
        Ok(flags.mean())
    }

    /// Rows whose (date, currency) had no rate
    pub fn rows_without_rate(&self) -> Result<usize> {
        Ok(self.frame.column(RATE_COLUMN)?.null_count())
    }

    /// Estimated heap footprint of every column, in bytes
    pub fn memory_usage(&self) -> usize {
        self.frame.estimated_size()
    }

    /// Footprint in mebibytes, as reported in the summary
    pub fn memory_usage_mb(&self) -> f64 {
        self.memory_usage() as f64 / (1024.0 * 1024.0)
    }

    pub fn rate_to_usd(&self) -> Result<Vec<Option<f64>>> {
        let rates = self.frame.column(RATE_COLUMN)?.f64()?;
        Ok(rates.into_iter().collect())
    }

    pub fn amount_usd(&self) -> Result<Vec<Option<f32>>> {
        let amounts = self.frame.column(AMOUNT_USD_COLUMN)?.f32()?;
        Ok(amounts.into_iter().collect())
    }
}

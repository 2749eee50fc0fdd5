//! Summary statistics and chart data for the enriched table
//!
//! - **aggregate**: the polars aggregations behind each chart
//! - **render**: terminal drawing of a finished report
//! - **text**: localized titles and labels

pub mod aggregate;
pub mod render;
pub mod text;

pub use aggregate::{
    amount_histogram, correlation_matrix, fraud_rate_by_hour, fraud_rate_by_weekday,
    sample_indices, top_fraud_devices, top_fraud_ips, CorrelationMatrix, Histogram, RateBucket,
    TopCount,
};
pub use render::Renderer;
pub use text::Text;

use crate::config::AnalysisConfig;
use crate::data::table::EnrichedTable;
use crate::error::Result;
use crate::types::{Locale, Percentage};
use serde::Serialize;

/// Headline numbers printed before the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    /// Estimated footprint of the working table in MB (bytes / 1024^2)
    pub memory_mb: f64,
    /// Share of fraudulent rows, 0 for an empty table
    pub fraud_rate: Percentage,
    /// Rows whose (date, currency) had no exchange rate
    pub rows_without_rate: usize,
}

impl Summary {
    pub fn from_table(table: &EnrichedTable) -> Result<Self> {
        Ok(Self {
            rows: table.len(),
            memory_mb: table.memory_usage_mb(),
            fraud_rate: table.fraud_rate()?.unwrap_or(0.0),
            rows_without_rate: table.rows_without_rate()?,
        })
    }
}

/// Everything the tool displays, computed once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub locale: Locale,
    pub summary: Summary,
    pub sample_size: usize,
    /// Configured length of the top IP / device lists
    pub top_n: usize,
    pub histogram: Option<Histogram>,
    pub correlation: CorrelationMatrix,
    pub top_ips: Vec<TopCount>,
    pub top_devices: Vec<TopCount>,
    pub hourly: Vec<RateBucket>,
    pub weekday: Vec<RateBucket>,
}

impl AnalysisReport {
    /// Run every aggregation over the table
    pub fn build(table: &EnrichedTable, config: &AnalysisConfig) -> Result<Self> {
        let sample = sample_indices(table.len(), config.sample_fraction, config.sample_seed);
        log::debug!(
            "Histogram sample: {} of {} rows (seed {})",
            sample.len(),
            table.len(),
            config.sample_seed
        );

        Ok(Self {
            locale: config.locale,
            summary: Summary::from_table(table)?,
            sample_size: sample.len(),
            top_n: config.top_n,
            histogram: amount_histogram(table, &sample, config.histogram_bins)?,
            correlation: correlation_matrix(table)?,
            top_ips: top_fraud_ips(table, config.top_n)?,
            top_devices: top_fraud_devices(table, config.top_n)?,
            hourly: fraud_rate_by_hour(table)?,
            weekday: fraud_rate_by_weekday(table, config.locale)?,
        })
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! End-to-end analysis run: load, normalize, join, aggregate

use crate::config::AnalysisConfig;
use crate::data::fx::{attach_usd_amounts, WideExchangeTable};
use crate::data::loader::{load_exchange_rates, load_transactions};
use crate::data::normalize::normalize_transactions;
use crate::data::table::EnrichedTable;
use crate::error::Result;
use crate::report::AnalysisReport;
use polars::prelude::DataFrame;

/// Runs the fixed analysis pipeline
pub struct AnalysisEngine {
    config: AnalysisConfig,
}

impl AnalysisEngine {
    /// Create an engine; the configuration is validated up front
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Read both parquet files and build the enriched table
    pub fn load(&self) -> Result<EnrichedTable> {
        let transactions = load_transactions(&self.config.transactions_path)?;
        let exchange = load_exchange_rates(&self.config.exchange_path)?;
        self.enrich(transactions, exchange)
    }

    /// Normalize transactions and join them to the exchange rates.
    ///
    /// The raw frames and the wide exchange table are dropped as soon as
    /// they have been consumed, so only the enriched frame stays resident.
    pub fn enrich(&self, transactions: DataFrame, exchange: DataFrame) -> Result<EnrichedTable> {
        let table = normalize_transactions(&transactions)?;
        drop(transactions);

        let wide = WideExchangeTable::from_frame(&exchange)?;
        drop(exchange);
        let long = wide.melt()?;
        log::debug!(
            "Reshaped exchange rates: {} dates x {} currencies -> {} rows",
            wide.num_dates(),
            wide.num_currencies(),
            long.len()
        );
        drop(wide);

        attach_usd_amounts(table, long)
    }

    /// Load, enrich and aggregate
    pub fn run(&self) -> Result<AnalysisReport> {
        let table = self.load()?;
        self.report(&table)
    }

    /// Aggregate an already enriched table
    pub fn report(&self, table: &EnrichedTable) -> Result<AnalysisReport> {
        let report = AnalysisReport::build(table, &self.config)?;
        log::info!(
            "Analysis complete: {} rows, {:.2} MB, fraud rate {:.2}%",
            report.summary.rows,
            report.summary.memory_mb,
            report.summary.fraud_rate * 100.0
        );
        Ok(report)
    }
}

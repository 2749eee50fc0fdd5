//! # fraud_eda
//!
//! Exploratory fraud analysis over a transaction dataset.
//!
//! The pipeline loads transactions and a wide table of daily exchange rates
//! from parquet into polars frames. It normalizes types and converts every
//! amount to USD with the same-day rate. Then it aggregates the data behind
//! six descriptive charts.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fraud_eda::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let engine = AnalysisEngine::new(AnalysisConfig::default())?;
//!     let report = engine.run()?;
//!
//!     let renderer = Renderer::new(60, Locale::En);
//!     renderer.render(&report, &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod report;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::AnalysisConfig;
    pub use crate::data::fx::{LongExchangeTable, WideExchangeTable};
    pub use crate::data::{normalize_transactions, EnrichedTable};
    pub use crate::engine::AnalysisEngine;
    pub use crate::error::{EdaError, Result};
    pub use crate::report::{AnalysisReport, Renderer, Summary};
    pub use crate::types::*;
}

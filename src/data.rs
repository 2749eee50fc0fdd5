//! Transaction and exchange-rate data handling
//!
//! - **loader**: parquet scans with the fixed column projection
//! - **columns**: dtype coercion of polars columns
//! - **normalize**: timestamps, flags, categorical casts, derived time features
//! - **table**: the enriched transaction frame
//! - **fx**: exchange-rate reshaping and the USD join

pub mod columns;
pub mod fx;
pub mod loader;
pub mod normalize;
pub mod table;

pub use normalize::normalize_transactions;
pub use table::EnrichedTable;

//! Foreign exchange (FX) rates for USD normalization
//!
//! # Components
//!
//! - **reshape**: wide (date x currency) and long (date, currency, rate) layouts
//! - **join**: validated many-to-one join of transactions to rates
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fraud_eda::data::fx::WideExchangeTable;
//!
//! let day = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
//! let wide = WideExchangeTable::from_columns(
//!     &[day],
//!     &["EUR".to_string()],
//!     &[vec![Some(1.10)]],
//! )
//! .unwrap();
//!
//! let long = wide.melt().unwrap();
//! assert_eq!(long.len(), 1);
//! assert_eq!(long.widen().unwrap(), wide);
//! ```

pub mod join;
pub mod reshape;

pub use join::{attach_usd_amounts, usd_amount};
pub use reshape::{LongExchangeTable, WideExchangeTable};

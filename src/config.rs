//! Analysis configuration
//!
//! Defaults reproduce the fixed setup (two relative parquet paths, 10% sample
//! with seed 42, top 10, 50 bins). A TOML file may override any subset of
//! keys; the binary applies command-line flags on top.

use crate::error::{EdaError, Result};
use crate::types::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Transaction parquet file
    pub transactions_path: PathBuf,
    /// Wide exchange-rate parquet file
    pub exchange_path: PathBuf,
    /// Fraction of rows drawn for the amount histogram
    pub sample_fraction: f64,
    /// Seed for the histogram sample
    pub sample_seed: u64,
    /// Length of the top IP / device lists
    pub top_n: usize,
    /// Histogram bins (log-spaced)
    pub histogram_bins: usize,
    /// Language of titles and labels
    pub locale: Locale,
    /// Longest bar, in terminal columns
    pub chart_width: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            transactions_path: PathBuf::from("data/transaction_fraud_data.parquet"),
            exchange_path: PathBuf::from("data/historical_currency_exchange.parquet"),
            sample_fraction: 0.1,
            sample_seed: 42,
            top_n: 10,
            histogram_bins: 50,
            locale: Locale::default(),
            chart_width: 60,
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the pipeline cannot use
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_fraction > 0.0 && self.sample_fraction <= 1.0) {
            return Err(EdaError::ConfigError(format!(
                "sample_fraction must be in (0, 1], got {}",
                self.sample_fraction
            )));
        }
        if self.top_n == 0 {
            return Err(EdaError::ConfigError("top_n must be at least 1".to_string()));
        }
        if self.histogram_bins == 0 {
            return Err(EdaError::ConfigError(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.chart_width == 0 {
            return Err(EdaError::ConfigError(
                "chart_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_seed, 42);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.locale, Locale::Ru);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            transactions_path = "/tmp/tx.parquet"
            locale = "en"
            "#,
        )
        .unwrap();

        assert_eq!(config.transactions_path, PathBuf::from("/tmp/tx.parquet"));
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.histogram_bins, 50);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AnalysisConfig::from_toml_str("sample_fraction = 1.5").unwrap_err(),
            EdaError::ConfigError(_)
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("top_n = 0").unwrap_err(),
            EdaError::ConfigError(_)
        ));
        assert!(matches!(
            AnalysisConfig::from_toml_str("unknown_key = 1").unwrap_err(),
            EdaError::TomlError(_)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "top_n = 3").unwrap();
        writeln!(file, "chart_width = 30").unwrap();

        let config = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.chart_width, 30);
    }
}

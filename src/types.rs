//! Core types and constants

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EdaError;

/// Timezone-naive UTC instant
pub type Timestamp = NaiveDateTime;

/// Calendar day used as the exchange join key
pub type Day = NaiveDate;

/// Money amount in the transaction's own currency
pub type Amount = f64;

/// Fraction in [0.0, 1.0]
pub type Percentage = f64;

/// Transaction columns read from the source file, in projection order
pub const TRANSACTION_COLUMNS: [&str; 15] = [
    "transaction_id",
    "customer_id",
    "timestamp",
    "amount",
    "currency",
    "country",
    "city",
    "device",
    "ip_address",
    "vendor_category",
    "is_fraud",
    "is_high_risk_vendor",
    "is_outside_home_country",
    "is_weekend",
    "last_hour_activity",
];

/// Columns stored label-encoded
pub const CATEGORICAL_COLUMNS: [&str; 5] =
    ["currency", "country", "city", "device", "vendor_category"];

/// Columns coerced to strict booleans
pub const FLAG_COLUMNS: [&str; 4] = [
    "is_fraud",
    "is_high_risk_vendor",
    "is_outside_home_country",
    "is_weekend",
];

/// Date column of the wide exchange table
pub const EXCHANGE_DATE_COLUMN: &str = "date";

/// Currency code column of the long exchange table and the transactions
pub const CURRENCY_COLUMN: &str = "currency";

/// Joined exchange rate
pub const RATE_COLUMN: &str = "rate_to_usd";

/// `amount / rate_to_usd` as `f32`
pub const AMOUNT_USD_COLUMN: &str = "amount_usd";

/// Field holding the count when `last_hour_activity` is a struct column
pub const ACTIVITY_COUNT_FIELD: &str = "num_transactions";

/// Language for chart titles, axis labels and weekday names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ru,
}

impl Locale {
    /// Short weekday labels, Monday first
    pub fn weekday_labels(&self) -> [&'static str; 7] {
        match self {
            Locale::En => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            Locale::Ru => ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Locale {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            other => Err(EdaError::ConfigError(format!(
                "Unknown locale: {} (expected 'en' or 'ru')",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_str() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_locale_is_russian() {
        assert_eq!(Locale::default(), Locale::Ru);
    }

    #[test]
    fn test_weekday_labels_start_monday() {
        assert_eq!(Locale::En.weekday_labels()[0], "Mon");
        assert_eq!(Locale::Ru.weekday_labels()[6], "Вс");
    }

    #[test]
    fn test_column_sets_are_subsets() {
        for c in CATEGORICAL_COLUMNS.iter().chain(FLAG_COLUMNS.iter()) {
            assert!(TRANSACTION_COLUMNS.contains(c));
        }
    }
}

//! Transaction normalization
//!
//! Coerces the projected transaction frame to fixed dtypes: naive UTC
//! timestamps, categorical labels, strict boolean flags and an integer
//! activity count. Then it derives the hour, weekday and date features.

use super::columns::{
    categorical_dtype, column, f64_series, flag_series, i64_series, struct_field_i64,
    text_series, timestamp_series,
};
use crate::error::Result;
use crate::types::{
    ACTIVITY_COUNT_FIELD, CATEGORICAL_COLUMNS, EXCHANGE_DATE_COLUMN, FLAG_COLUMNS,
    TRANSACTION_COLUMNS,
};
use polars::prelude::*;

const TABLE: &str = "transactions";

fn activity_series(s: &Series) -> Result<Series> {
    match s.dtype() {
        DataType::Struct(_) => struct_field_i64(s, ACTIVITY_COUNT_FIELD),
        _ => i64_series(s),
    }
}

fn coerce(name: &str, s: &Series) -> Result<Series> {
    match name {
        "timestamp" => timestamp_series(s),
        "amount" => f64_series(s),
        "last_hour_activity" => activity_series(s),
        _ if FLAG_COLUMNS.contains(&name) => flag_series(s),
        _ => text_series(s),
    }
}

/// Hour 0-23, weekday 0 = Monday .. 6 = Sunday, and the UTC calendar date
pub fn time_features() -> [Expr; 3] {
    [
        col("timestamp").dt().hour().cast(DataType::Int8).alias("hour"),
        (col("timestamp").dt().weekday() - lit(1))
            .cast(DataType::Int8)
            .alias("day_of_week"),
        col("timestamp").dt().date().alias(EXCHANGE_DATE_COLUMN),
    ]
}

/// Build the normalized frame from the projected transaction frame
pub fn normalize_transactions(df: &DataFrame) -> Result<DataFrame> {
    let columns = TRANSACTION_COLUMNS
        .iter()
        .map(|&name| coerce(name, column(df, TABLE, name)?))
        .collect::<Result<Vec<_>>>()?;

    let categoricals: Vec<Expr> = CATEGORICAL_COLUMNS
        .iter()
        .map(|&name| col(name).cast(categorical_dtype()))
        .collect();

    let frame = DataFrame::new(columns)?
        .lazy()
        .with_columns(categoricals)
        .with_columns(time_features())
        .collect()?;

    log::debug!(
        "Normalized {} transactions: {} currencies, {} countries, {} devices",
        frame.height(),
        frame.column("currency")?.n_unique()?,
        frame.column("country")?.n_unique()?,
        frame.column("device")?.n_unique()?
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;
    use chrono::NaiveDate;

    fn raw_frame(timestamps: &[&str]) -> DataFrame {
        let n = timestamps.len();
        df!(
            "transaction_id" => (0..n).map(|i| format!("T{i}")).collect::<Vec<_>>(),
            "customer_id" => vec!["C1"; n],
            "timestamp" => timestamps,
            "amount" => vec![100.0; n],
            "currency" => vec!["EUR"; n],
            "country" => vec!["Germany"; n],
            "city" => vec!["Berlin"; n],
            "device" => vec!["Chrome"; n],
            "ip_address" => vec!["10.0.0.1"; n],
            "vendor_category" => vec!["Retail"; n],
            "is_fraud" => vec![true; n],
            "is_high_risk_vendor" => vec![false; n],
            "is_outside_home_country" => vec![0i64; n],
            "is_weekend" => vec!["false"; n],
            "last_hour_activity" => vec![5i64; n]
        )
        .unwrap()
    }

    fn i8_values(df: &DataFrame, name: &str) -> Vec<Option<i8>> {
        df.column(name).unwrap().i8().unwrap().into_iter().collect()
    }

    #[test]
    fn test_derived_features() {
        // 2023-06-04 is a Sunday
        let df = raw_frame(&["2023-06-04 23:45:00+00:00", "2023-06-05 01:00:00+02:00"]);
        let frame = normalize_transactions(&df).unwrap();

        assert_eq!(i8_values(&frame, "hour"), vec![Some(23), Some(23)]);
        assert_eq!(i8_values(&frame, "day_of_week"), vec![Some(6), Some(6)]);
        let dates: Vec<_> = frame
            .column("date")
            .unwrap()
            .date()
            .unwrap()
            .as_date_iter()
            .collect();
        assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2023, 6, 4); 2]);
    }

    #[test]
    fn test_monday_is_zero() {
        let frame = normalize_transactions(&raw_frame(&["2024-01-01 00:00:00"])).unwrap();
        assert_eq!(i8_values(&frame, "day_of_week"), vec![Some(0)]);
        assert_eq!(i8_values(&frame, "hour"), vec![Some(0)]);
    }

    #[test]
    fn test_types_coerced() {
        let frame = normalize_transactions(&raw_frame(&["2023-06-01 10:00:00"])).unwrap();

        for name in CATEGORICAL_COLUMNS {
            assert!(
                matches!(frame.column(name).unwrap().dtype(), DataType::Categorical(..)),
                "{name} should be categorical"
            );
        }
        for name in FLAG_COLUMNS {
            assert_eq!(frame.column(name).unwrap().dtype(), &DataType::Boolean);
        }
        assert_eq!(
            frame.column("last_hour_activity").unwrap().dtype(),
            &DataType::Int64
        );
        assert_eq!(frame.column("currency").unwrap().n_unique().unwrap(), 1);
        assert_eq!(frame.width(), TRANSACTION_COLUMNS.len() + 3);
    }

    #[test]
    fn test_struct_activity_column() {
        let mut df = raw_frame(&["2023-06-01 10:00:00"]);
        let activity = df!(
            "num_transactions" => &[7i64],
            "total_amount" => &[250.0]
        )
        .unwrap()
        .into_struct("last_hour_activity")
        .into_series();
        df.with_column(activity).unwrap();

        let frame = normalize_transactions(&df).unwrap();
        let values: Vec<_> = frame
            .column("last_hour_activity")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(7)]);
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let df = raw_frame(&["2023-13-45 99:00:00"]);
        assert!(matches!(
            normalize_transactions(&df).unwrap_err(),
            EdaError::InvalidTimestamp { .. }
        ));
    }
}

//! Typed coercion of polars columns
//!
//! Each helper accepts the dtypes a parquet writer plausibly produced for
//! that logical column and fails with a typed error for anything else.

use crate::error::{EdaError, Result};
use crate::types::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Naive UTC instants at microsecond resolution
pub const TIMESTAMP_DTYPE: DataType = DataType::Datetime(TimeUnit::Microseconds, None);

/// Label-encoded strings, codes assigned in order of appearance
pub fn categorical_dtype() -> DataType {
    DataType::Categorical(None, CategoricalOrdering::Physical)
}

/// Look up a column by name
pub fn column<'a>(df: &'a DataFrame, table: &str, name: &str) -> Result<&'a Series> {
    df.column(name).map_err(|_| EdaError::MissingColumn {
        table: table.to_string(),
        column: name.to_string(),
    })
}

fn unsupported(s: &Series) -> EdaError {
    EdaError::UnsupportedType {
        column: s.name().to_string(),
        dtype: s.dtype().to_string(),
    }
}

fn null_at(s: &Series, row: usize) -> EdaError {
    EdaError::NullValue {
        column: s.name().to_string(),
        row,
    }
}

fn reject_nulls(s: &Series) -> Result<()> {
    if s.null_count() == 0 {
        return Ok(());
    }
    let mask = s.is_null();
    let row = mask.into_iter().position(|v| v == Some(true)).unwrap_or(0);
    Err(null_at(s, row))
}

/// Any scalar column as text
pub fn text_series(s: &Series) -> Result<Series> {
    Ok(s.cast(&DataType::String)?)
}

/// Numeric column as `f64`; malformed strings fail
pub fn f64_series(s: &Series) -> Result<Series> {
    Ok(s.strict_cast(&DataType::Float64)?)
}

/// Integer column as `i64`; malformed strings fail
pub fn i64_series(s: &Series) -> Result<Series> {
    Ok(s.strict_cast(&DataType::Int64)?)
}

/// Struct column: one integer field, keeping the struct column's name
pub fn struct_field_i64(s: &Series, field: &str) -> Result<Series> {
    let inner = s.struct_()?.field_by_name(field)?;
    Ok(i64_series(&inner)?.with_name(s.name()))
}

/// Optional `f64` values, for the few callers that iterate in Rust
pub fn f64_values(s: &Series) -> Result<Vec<Option<f64>>> {
    let cast = f64_series(s)?;
    let values = cast.f64()?.into_iter().collect();
    Ok(values)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Strict boolean column: no nulls, only 0/1 or true/false
pub fn flag_series(s: &Series) -> Result<Series> {
    reject_nulls(s)?;
    let invalid = |row: usize, value: String| EdaError::InvalidFlag {
        column: s.name().to_string(),
        row,
        value,
    };

    match s.dtype() {
        DataType::Boolean => Ok(s.clone()),
        dtype if dtype.is_integer() => {
            let cast = s.cast(&DataType::Int64)?;
            let ints = cast.i64()?;
            let bad = ints
                .into_iter()
                .enumerate()
                .find(|(_, v)| !matches!(v, Some(0) | Some(1)));
            if let Some((row, v)) = bad {
                return Err(invalid(row, v.map(|v| v.to_string()).unwrap_or_default()));
            }
            Ok(s.cast(&DataType::Boolean)?)
        }
        DataType::String => {
            let values = s
                .str()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    let v = v.unwrap_or_default();
                    parse_flag(v).ok_or_else(|| invalid(row, v.to_string()))
                })
                .collect::<Result<Vec<bool>>>()?;
            Ok(Series::new(s.name(), values))
        }
        _ => Err(unsupported(s)),
    }
}

const OFFSET_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string to a naive UTC instant.
///
/// Strings with an offset are shifted to UTC; strings without one are taken
/// as UTC already. A bare date means midnight.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Timestamp column as naive UTC instants (`TIMESTAMP_DTYPE`).
///
/// Zoned datetimes keep their instant and lose the zone. Nulls and
/// unparseable strings fail.
pub fn timestamp_series(s: &Series) -> Result<Series> {
    reject_nulls(s)?;

    let out = match s.dtype() {
        DataType::Datetime(unit, _) => {
            // Physical values are UTC epoch ticks whatever the zone
            let ticks = s.to_physical_repr().i64()?.clone();
            ticks
                .into_datetime(*unit, None)
                .into_series()
                .cast(&TIMESTAMP_DTYPE)?
        }
        DataType::Date => s.cast(&TIMESTAMP_DTYPE)?,
        DataType::String => {
            let values = s
                .str()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    let v = v.unwrap_or_default();
                    parse_timestamp(v).ok_or_else(|| EdaError::InvalidTimestamp {
                        column: s.name().to_string(),
                        row,
                        value: v.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            DatetimeChunked::from_naive_datetime(s.name(), values, TimeUnit::Microseconds)
                .into_series()
        }
        _ => return Err(unsupported(s)),
    };
    Ok(out.with_name(s.name()))
}

/// Calendar-day column (date, datetime or string) as polars `Date`
pub fn date_series(s: &Series) -> Result<Series> {
    match s.dtype() {
        DataType::Date => {
            reject_nulls(s)?;
            Ok(s.clone())
        }
        _ => Ok(timestamp_series(s)?.cast(&DataType::Date)?),
    }
}

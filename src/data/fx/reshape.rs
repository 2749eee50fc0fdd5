//! Wide <-> long exchange-rate layouts
//!
//! The source table is wide: one row per date, one column per currency.
//! The join works on the long layout: one row per (date, currency).
//!
//! The long table remembers the date and currency axes of the wide table it
//! came from, so a table with no dates still widens back to its currencies
//! and one with no currencies still widens back to its dates.

use crate::data::columns::{categorical_dtype, column, date_series, f64_series, f64_values};
use crate::error::{EdaError, Result};
use crate::types::{Day, CURRENCY_COLUMN, EXCHANGE_DATE_COLUMN, RATE_COLUMN};
use polars::prelude::*;

const TABLE: &str = "exchange rates";

fn day_values(s: &Series) -> Result<Vec<Day>> {
    Ok(s.date()?.as_date_iter().flatten().collect())
}

/// Exchange rates, one `Date` column plus one `Float64` column per currency
#[derive(Debug, Clone, PartialEq)]
pub struct WideExchangeTable {
    frame: DataFrame,
}

/// Exchange rates, one row per (date, currency)
#[derive(Debug, Clone, PartialEq)]
pub struct LongExchangeTable {
    /// `date` (Date), `currency` (Categorical), `rate_to_usd` (Float64)
    frame: DataFrame,
    /// Date axis, in wide row order
    dates: Series,
    /// Currency axis, in wide column order
    currencies: Vec<String>,
}

impl WideExchangeTable {
    /// Build from the raw frame: `date` plus every other column as a currency
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        columns.push(date_series(column(df, TABLE, EXCHANGE_DATE_COLUMN)?)?);
        for series in df.get_columns() {
            if series.name() != EXCHANGE_DATE_COLUMN {
                columns.push(f64_series(series)?);
            }
        }
        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    /// Build from a date axis and one rate column per currency
    /// (`rates[c][d]` is the rate of `currencies[c]` on `dates[d]`)
    pub fn from_columns(
        dates: &[Day],
        currencies: &[String],
        rates: &[Vec<Option<f64>>],
    ) -> Result<Self> {
        if rates.len() != currencies.len() {
            return Err(EdaError::LengthMismatch {
                column: "currencies".to_string(),
                expected: currencies.len(),
                actual: rates.len(),
            });
        }

        let mut columns = Vec::with_capacity(currencies.len() + 1);
        columns.push(
            DateChunked::from_naive_date(EXCHANGE_DATE_COLUMN, dates.iter().copied())
                .into_series(),
        );
        for (currency, values) in currencies.iter().zip(rates) {
            if values.len() != dates.len() {
                return Err(EdaError::LengthMismatch {
                    column: currency.clone(),
                    expected: dates.len(),
                    actual: values.len(),
                });
            }
            columns.push(Series::new(currency, values));
        }
        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn num_dates(&self) -> usize {
        self.frame.height()
    }

    pub fn num_currencies(&self) -> usize {
        self.frame.width().saturating_sub(1)
    }

    /// Currency codes, in column order
    pub fn currencies(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .filter(|name| *name != EXCHANGE_DATE_COLUMN)
            .map(str::to_string)
            .collect()
    }

    pub fn dates(&self) -> Result<Vec<Day>> {
        day_values(self.frame.column(EXCHANGE_DATE_COLUMN)?)
    }

    /// Rates of one currency, in date order
    pub fn rates(&self, currency: &str) -> Result<Vec<Option<f64>>> {
        f64_values(column(&self.frame, TABLE, currency)?)
    }

    /// Unpivot to long form.
    ///
    /// Output is column-major: every date of the first currency, then every
    /// date of the next one. Null cells are kept as null rates.
    pub fn melt(&self) -> Result<LongExchangeTable> {
        let currencies = self.currencies();
        let dates = self.frame.column(EXCHANGE_DATE_COLUMN)?.clone();

        let frame = if currencies.is_empty() || dates.is_empty() {
            LongExchangeTable::empty_frame()?
        } else {
            let mut long = self.frame.melt([EXCHANGE_DATE_COLUMN], &currencies)?;
            long.rename("variable", CURRENCY_COLUMN)?;
            long.rename("value", RATE_COLUMN)?;
            long.lazy()
                .with_column(col(CURRENCY_COLUMN).cast(categorical_dtype()))
                .collect()?
        };

        Ok(LongExchangeTable {
            frame,
            dates,
            currencies,
        })
    }
}

impl LongExchangeTable {
    fn empty_frame() -> Result<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new_empty(EXCHANGE_DATE_COLUMN, &DataType::Date),
            Series::new_empty(CURRENCY_COLUMN, &categorical_dtype()),
            Series::new_empty(RATE_COLUMN, &DataType::Float64),
        ])?)
    }

    /// Build from long rows. The axes are the dates and currencies in
    /// first-seen order.
    pub fn from_rows(
        dates: &[Day],
        currencies: &[Option<&str>],
        rates: &[Option<f64>],
    ) -> Result<Self> {
        for (name, actual) in [(CURRENCY_COLUMN, currencies.len()), (RATE_COLUMN, rates.len())] {
            if actual != dates.len() {
                return Err(EdaError::LengthMismatch {
                    column: name.to_string(),
                    expected: dates.len(),
                    actual,
                });
            }
        }

        let frame = DataFrame::new(vec![
            DateChunked::from_naive_date(EXCHANGE_DATE_COLUMN, dates.iter().copied())
                .into_series(),
            Series::new(CURRENCY_COLUMN, currencies).cast(&categorical_dtype())?,
            Series::new(RATE_COLUMN, rates),
        ])?;

        let date_axis = frame.column(EXCHANGE_DATE_COLUMN)?.unique_stable()?;
        let currency_axis = frame
            .column(CURRENCY_COLUMN)?
            .cast(&DataType::String)?
            .unique_stable()?;
        let currencies = currency_axis
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();

        Ok(Self {
            frame,
            dates: date_axis,
            currencies,
        })
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Currency axis
    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    /// Date axis
    pub fn dates(&self) -> Result<Vec<Day>> {
        day_values(&self.dates)
    }

    /// First (date, currency) key that occurs on more than one row, in
    /// table order, with its row count. Null currencies are ignored.
    pub fn first_duplicate_key(&self) -> Result<Option<(Day, String, usize)>> {
        let repeated = self
            .frame
            .clone()
            .lazy()
            .filter(col(CURRENCY_COLUMN).is_not_null())
            .group_by_stable([
                col(EXCHANGE_DATE_COLUMN),
                col(CURRENCY_COLUMN).cast(DataType::String),
            ])
            .agg([col(EXCHANGE_DATE_COLUMN).count().alias("matches")])
            .filter(col("matches").gt(lit(1)))
            .limit(1)
            .collect()?;

        if repeated.height() == 0 {
            return Ok(None);
        }
        let date = day_values(repeated.column(EXCHANGE_DATE_COLUMN)?)?.first().copied();
        let currency = repeated
            .column(CURRENCY_COLUMN)?
            .str()?
            .get(0)
            .map(str::to_string);
        let matches = repeated
            .column("matches")?
            .cast(&DataType::UInt64)?
            .u64()?
            .get(0);

        Ok(match (date, currency, matches) {
            (Some(date), Some(currency), Some(matches)) => {
                Some((date, currency, matches as usize))
            }
            _ => None,
        })
    }

    /// Pivot back to wide form.
    ///
    /// Dates and currencies follow the axes. Cells with no long row are
    /// null. Rows with a null currency are skipped. A repeated
    /// (date, currency) key fails.
    pub fn widen(&self) -> Result<WideExchangeTable> {
        if let Some((date, currency, _)) = self.first_duplicate_key()? {
            return Err(EdaError::DuplicateKey { date, currency });
        }

        let mut wide = DataFrame::new(vec![self.dates.clone()])?.lazy();
        for currency in &self.currencies {
            let rates = self
                .frame
                .clone()
                .lazy()
                .filter(
                    col(CURRENCY_COLUMN)
                        .cast(DataType::String)
                        .eq(lit(currency.as_str())),
                )
                .select([
                    col(EXCHANGE_DATE_COLUMN),
                    col(RATE_COLUMN).alias(currency.as_str()),
                ]);
            wide = wide.join(
                rates,
                [col(EXCHANGE_DATE_COLUMN)],
                [col(EXCHANGE_DATE_COLUMN)],
                JoinArgs::new(JoinType::Left),
            );
        }

        Ok(WideExchangeTable {
            frame: wide.collect()?,
        })
    }
}

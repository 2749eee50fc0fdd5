//! Read-only chart aggregations over the enriched table

use crate::data::table::EnrichedTable;
use crate::error::Result;
use crate::types::{Locale, Percentage, AMOUNT_USD_COLUMN};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::Serialize;

/// Sorted row indices of a seeded random sample without replacement.
///
/// The sample size is `fraction * len` rounded to the nearest row.
pub fn sample_indices(len: usize, fraction: f64, seed: u64) -> Vec<usize> {
    let amount = ((len as f64) * fraction).round() as usize;
    let amount = amount.min(len);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = index::sample(&mut rng, len, amount).into_vec();
    rows.sort_unstable();
    rows
}

/// Density histogram of USD amounts on a log10 axis, split by fraud flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin edges in USD, `bins + 1` values
    pub bin_edges: Vec<f64>,
    /// Density of non-fraud rows per bin
    pub legit: Vec<f64>,
    /// Density of fraud rows per bin
    pub fraud: Vec<f64>,
    /// Rows that contributed (positive, non-null amount)
    pub observations: usize,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.legit.len()
    }

    /// Width of bin `i` in log10 units
    pub fn log_width(&self, i: usize) -> f64 {
        self.bin_edges[i + 1].log10() - self.bin_edges[i].log10()
    }
}

/// `(log10 amount_usd, is_fraud)` for the sampled rows with a positive,
/// finite amount
fn log_amounts(table: &EnrichedTable, rows: &[usize]) -> Result<Vec<(f64, bool)>> {
    let indices = IdxCa::from_vec("", rows.iter().map(|&row| row as IdxSize).collect());
    let sample = table
        .frame()
        .select([AMOUNT_USD_COLUMN, "is_fraud"])?
        .take(&indices)?
        .lazy()
        .filter(
            col(AMOUNT_USD_COLUMN)
                .gt(lit(0.0f32))
                .and(col(AMOUNT_USD_COLUMN).lt(lit(f32::INFINITY))),
        )
        .select([col(AMOUNT_USD_COLUMN).cast(DataType::Float64), col("is_fraud")])
        .collect()?;

    let amounts = sample.column(AMOUNT_USD_COLUMN)?.f64()?;
    let flags = sample.column("is_fraud")?.bool()?;
    let points = amounts
        .into_iter()
        .zip(flags)
        .filter_map(|(amount, fraud)| Some((amount?.log10(), fraud?)))
        .collect();
    Ok(points)
}

/// Histogram of `amount_usd` over the given rows.
///
/// Bins are evenly spaced in log10 space over the positive values present;
/// nulls and non-positive amounts are dropped. Densities are normalized over
/// both groups together, so the summed bar areas (in log10 units) equal 1.
/// Returns `None` when no row has a positive amount.
pub fn amount_histogram(
    table: &EnrichedTable,
    rows: &[usize],
    bins: usize,
) -> Result<Option<Histogram>> {
    let points = log_amounts(table, rows)?;
    if points.is_empty() || bins == 0 {
        return Ok(None);
    }

    let mut lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let mut hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut legit = vec![0usize; bins];
    let mut fraud = vec![0usize; bins];
    for (value, is_fraud) in &points {
        let bin = (((value - lo) / width).floor() as usize).min(bins - 1);
        if *is_fraud {
            fraud[bin] += 1;
        } else {
            legit[bin] += 1;
        }
    }

    let norm = points.len() as f64 * width;
    let density = |counts: Vec<usize>| -> Vec<f64> {
        counts.into_iter().map(|c| c as f64 / norm).collect()
    };

    Ok(Some(Histogram {
        bin_edges: (0..=bins)
            .map(|i| 10f64.powf(lo + width * i as f64))
            .collect(),
        legit: density(legit),
        fraud: density(fraud),
        observations: points.len(),
    }))
}

/// Pearson correlation matrix; `None` where undefined (constant or < 2 pairs)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        self.values[i][j]
    }
}

/// Columns of the correlation heatmap
pub const CORRELATION_COLUMNS: [&str; 4] = [AMOUNT_USD_COLUMN, "hour", "day_of_week", "is_fraud"];

fn pearson_expr(x: &str, y: &str) -> Expr {
    pearson_corr(
        col(x).cast(DataType::Float64),
        col(y).cast(DataType::Float64),
        1,
    )
}

fn finite(out: &DataFrame, name: &str) -> Result<Option<f64>> {
    let value = out.column(name)?.cast(&DataType::Float64)?.f64()?.get(0);
    Ok(value.filter(|r| r.is_finite()).map(|r| r.clamp(-1.0, 1.0)))
}

/// Pearson correlation of two columns over pairwise-complete rows
pub fn pearson(frame: &DataFrame, x: &str, y: &str) -> Result<Option<f64>> {
    let out = frame
        .clone()
        .lazy()
        .select([pearson_expr(x, y).alias("r")])
        .collect()?;
    finite(&out, "r")
}

/// Correlation over amount_usd, hour, day_of_week and is_fraud
pub fn correlation_matrix(table: &EnrichedTable) -> Result<CorrelationMatrix> {
    let cell = |i: usize, j: usize| format!("r_{i}_{j}");

    let mut exprs = Vec::with_capacity(CORRELATION_COLUMNS.len().pow(2));
    for (i, x) in CORRELATION_COLUMNS.iter().enumerate() {
        for (j, y) in CORRELATION_COLUMNS.iter().enumerate() {
            exprs.push(pearson_expr(x, y).alias(&cell(i, j)));
        }
    }
    let out = table.frame().clone().lazy().select(exprs).collect()?;

    let mut values = Vec::with_capacity(CORRELATION_COLUMNS.len());
    for i in 0..CORRELATION_COLUMNS.len() {
        let mut row = Vec::with_capacity(CORRELATION_COLUMNS.len());
        for j in 0..CORRELATION_COLUMNS.len() {
            let r = finite(&out, &cell(i, j))?;
            row.push(if i == j { r.map(|_| 1.0) } else { r });
        }
        values.push(row);
    }

    Ok(CorrelationMatrix {
        labels: CORRELATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

/// Label with its number of fraudulent transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopCount {
    pub label: String,
    pub count: usize,
}

/// The `n` values of `label` with the most fraudulent rows.
///
/// Null labels are ignored. Ties are broken by label so output is stable.
pub fn top_fraud_counts(table: &EnrichedTable, label: &str, n: usize) -> Result<Vec<TopCount>> {
    let ranked = table
        .frame()
        .clone()
        .lazy()
        .filter(col("is_fraud").and(col(label).is_not_null()))
        .group_by([col(label).cast(DataType::String)])
        .agg([col("is_fraud").count().alias("count")])
        .sort_by_exprs([col("count"), col(label)], [true, false], false, false)
        .limit(n as IdxSize)
        .collect()?;

    let labels = ranked.column(label)?.str()?;
    let counts = ranked.column("count")?.cast(&DataType::UInt64)?;
    let top = labels
        .into_iter()
        .zip(counts.u64()?)
        .filter_map(|(label, count)| {
            Some(TopCount {
                label: label?.to_string(),
                count: count? as usize,
            })
        })
        .collect();
    Ok(top)
}

pub fn top_fraud_ips(table: &EnrichedTable, n: usize) -> Result<Vec<TopCount>> {
    top_fraud_counts(table, "ip_address", n)
}

pub fn top_fraud_devices(table: &EnrichedTable, n: usize) -> Result<Vec<TopCount>> {
    top_fraud_counts(table, "device", n)
}

/// Fraud share within one hour or weekday bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateBucket {
    pub bucket: u8,
    pub label: String,
    pub transactions: usize,
    pub frauds: usize,
    /// `frauds / transactions`, 0 for an empty bucket
    pub rate: Percentage,
}

/// Group by `key` and place each group's mean fraud rate in the bucket
/// with that index. Buckets with no rows keep rate 0.
fn fraud_rate_by(table: &EnrichedTable, key: &str, labels: &[String]) -> Result<Vec<RateBucket>> {
    let grouped = table
        .frame()
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([
            col("is_fraud").count().alias("transactions"),
            col("is_fraud").cast(DataType::UInt32).sum().alias("frauds"),
            col("is_fraud").cast(DataType::Float64).mean().alias("rate"),
        ])
        .collect()?;

    let mut buckets: Vec<RateBucket> = labels
        .iter()
        .enumerate()
        .map(|(b, label)| RateBucket {
            bucket: b as u8,
            label: label.clone(),
            transactions: 0,
            frauds: 0,
            rate: 0.0,
        })
        .collect();

    let keys = grouped.column(key)?.cast(&DataType::Int64)?;
    let totals = grouped.column("transactions")?.cast(&DataType::UInt64)?;
    let frauds = grouped.column("frauds")?.cast(&DataType::UInt64)?;
    let rates = grouped.column("rate")?;
    let rows = keys
        .i64()?
        .into_iter()
        .zip(totals.u64()?)
        .zip(frauds.u64()?)
        .zip(rates.f64()?);

    for (((key, total), fraud), rate) in rows {
        let bucket = key
            .and_then(|k| usize::try_from(k).ok())
            .and_then(|k| buckets.get_mut(k));
        if let Some(bucket) = bucket {
            bucket.transactions = total.unwrap_or(0) as usize;
            bucket.frauds = fraud.unwrap_or(0) as usize;
            bucket.rate = rate.unwrap_or(0.0);
        }
    }
    Ok(buckets)
}

/// Mean fraud rate for each hour 0-23
pub fn fraud_rate_by_hour(table: &EnrichedTable) -> Result<Vec<RateBucket>> {
    let labels: Vec<String> = (0..24).map(|h| h.to_string()).collect();
    fraud_rate_by(table, "hour", &labels)
}

/// Mean fraud rate for each weekday, Monday first
pub fn fraud_rate_by_weekday(table: &EnrichedTable, locale: Locale) -> Result<Vec<RateBucket>> {
    let labels: Vec<String> = locale
        .weekday_labels()
        .iter()
        .map(|l| l.to_string())
        .collect();
    fraud_rate_by(table, "day_of_week", &labels)
}

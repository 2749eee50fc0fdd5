use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fraud_eda::config::AnalysisConfig;
use fraud_eda::data::fx::{attach_usd_amounts, WideExchangeTable};
use fraud_eda::data::{normalize_transactions, EnrichedTable};
use fraud_eda::report::AnalysisReport;
use polars::prelude::*;

const CURRENCIES: [&str; 6] = ["EUR", "GBP", "JPY", "BRL", "MXN", "AUD"];
const DEVICES: [&str; 5] = ["Chrome", "Safari", "Firefox", "iOS App", "Android App"];

fn exchange_table(days: i64) -> WideExchangeTable {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<_> = (0..days).map(|d| start + Duration::days(d)).collect();
    let currencies: Vec<_> = CURRENCIES.iter().map(|c| c.to_string()).collect();
    let rates: Vec<Vec<Option<f64>>> = (0..CURRENCIES.len())
        .map(|i| (0..days).map(|d| Some(1.0 + i as f64 * 0.1 + d as f64 * 0.001)).collect())
        .collect();
    WideExchangeTable::from_columns(&dates, &currencies, &rates).unwrap()
}

fn transactions(rows: usize, days: i64) -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let raw = df!(
        "transaction_id" => (0..rows).map(|i| format!("TX_{i}")).collect::<Vec<_>>(),
        "customer_id" => (0..rows).map(|i| format!("CUST_{}", i % 500)).collect::<Vec<_>>(),
        "timestamp" => (0..rows)
            .map(|i| start + Duration::minutes((i as i64 * 37) % (days * 24 * 60)))
            .collect::<Vec<_>>(),
        "amount" => (0..rows).map(|i| 10.0 + (i % 997) as f64).collect::<Vec<_>>(),
        "currency" => (0..rows).map(|i| CURRENCIES[i % CURRENCIES.len()]).collect::<Vec<_>>(),
        "country" => vec!["Germany"; rows],
        "city" => vec!["Berlin"; rows],
        "device" => (0..rows).map(|i| DEVICES[i % DEVICES.len()]).collect::<Vec<_>>(),
        "ip_address" => (0..rows).map(|i| format!("10.0.{}.{}", i % 7, i % 251)).collect::<Vec<_>>(),
        "vendor_category" => vec!["Retail"; rows],
        "is_fraud" => (0..rows).map(|i| i % 5 == 0).collect::<Vec<_>>(),
        "is_high_risk_vendor" => vec![false; rows],
        "is_outside_home_country" => vec![false; rows],
        "is_weekend" => vec![false; rows],
        "last_hour_activity" => vec![1i64; rows]
    )
    .unwrap();
    normalize_transactions(&raw).unwrap()
}

fn enriched(rows: usize) -> EnrichedTable {
    attach_usd_amounts(transactions(rows, 90), exchange_table(90).melt().unwrap()).unwrap()
}

fn benchmark_join(c: &mut Criterion) {
    let wide = exchange_table(365);
    let table = transactions(100_000, 365);

    c.bench_function("usd_join_100k", |b| {
        b.iter(|| {
            let joined =
                attach_usd_amounts(black_box(table.clone()), wide.melt().unwrap()).unwrap();
            black_box(joined.len())
        });
    });
}

fn benchmark_reshape(c: &mut Criterion) {
    let wide = exchange_table(3650);

    c.bench_function("melt_widen_10y", |b| {
        b.iter(|| black_box(wide.melt().unwrap().widen().unwrap()));
    });
}

fn benchmark_report(c: &mut Criterion) {
    let table = enriched(100_000);
    let config = AnalysisConfig::default();

    c.bench_function("report_100k", |b| {
        b.iter(|| black_box(AnalysisReport::build(&table, &config).unwrap()));
    });
}

criterion_group!(benches, benchmark_join, benchmark_reshape, benchmark_report);
criterion_main!(benches);

//! Parquet loading for the transaction and exchange-rate tables

use crate::error::{EdaError, Result};
use crate::types::{EXCHANGE_DATE_COLUMN, TRANSACTION_COLUMNS};
use polars::prelude::*;
use std::io;
use std::path::Path;

fn scan(path: &Path) -> Result<LazyFrame> {
    if !path.exists() {
        return Err(EdaError::IoError(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{}: no such file", path.display()),
        )));
    }
    Ok(LazyFrame::scan_parquet(path, ScanArgsParquet::default())?)
}

fn require_columns(lf: &LazyFrame, table: &str, columns: &[&str]) -> Result<()> {
    let schema = lf.schema()?;
    for column in columns {
        if schema.get(column).is_none() {
            return Err(EdaError::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Read the transaction file restricted to the fixed column set
pub fn load_transactions<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let lf = scan(path)?;
    require_columns(&lf, "transactions", &TRANSACTION_COLUMNS)?;

    let projection: Vec<Expr> = TRANSACTION_COLUMNS.iter().map(|name| col(name)).collect();
    let df = lf.select(projection).collect()?;

    log::info!(
        "Loaded {} transactions from {}",
        df.height(),
        path.display()
    );
    Ok(df)
}

/// Read the wide exchange-rate file (date + one column per currency)
pub fn load_exchange_rates<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let lf = scan(path)?;
    require_columns(&lf, "exchange rates", &[EXCHANGE_DATE_COLUMN])?;

    let df = lf.collect()?;
    log::info!(
        "Loaded {} exchange-rate dates x {} currencies from {}",
        df.height(),
        df.width().saturating_sub(1),
        path.display()
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn write_parquet(dir: &TempDir, name: &str, df: &mut DataFrame) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        ParquetWriter::new(&mut file).finish(df).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_transactions("does/not/exist.parquet").unwrap_err();
        assert!(matches!(err, EdaError::IoError(_)));
    }

    #[test]
    fn test_exchange_requires_date_column() {
        let dir = TempDir::new().unwrap();
        let mut df = df!("EUR" => &[1.1], "GBP" => &[1.3]).unwrap();
        let path = write_parquet(&dir, "fx.parquet", &mut df);

        let err = load_exchange_rates(&path).unwrap_err();
        assert!(matches!(err, EdaError::MissingColumn { .. }));
    }

    #[test]
    fn test_transactions_missing_column() {
        let dir = TempDir::new().unwrap();
        let mut df = df!("transaction_id" => &["T1"], "amount" => &[10.0]).unwrap();
        let path = write_parquet(&dir, "tx.parquet", &mut df);

        match load_transactions(&path).unwrap_err() {
            EdaError::MissingColumn { column, .. } => assert_eq!(column, "customer_id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exchange_loads_all_columns() {
        let dir = TempDir::new().unwrap();
        let mut df = df!(
            "date" => &["2023-06-01", "2023-06-02"],
            "EUR" => &[1.10, 1.11],
            "GBP" => &[1.25, 1.26]
        )
        .unwrap();
        let path = write_parquet(&dir, "fx.parquet", &mut df);

        let loaded = load_exchange_rates(&path).unwrap();
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.width(), 3);
    }
}

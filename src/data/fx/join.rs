//! Left join of transactions to same-day exchange rates
//!
//! The rate side must be unique per (date, currency): many transactions may
//! share one rate row, but one transaction never matches two. A repeated key
//! fails the join instead of duplicating transaction rows.
//!
//! polars validates join cardinality on single-column keys only, so both
//! sides are keyed on `"<date>|<currency>"`.

use super::reshape::LongExchangeTable;
use crate::data::table::EnrichedTable;
use crate::error::{EdaError, Result};
use crate::types::{AMOUNT_USD_COLUMN, CURRENCY_COLUMN, EXCHANGE_DATE_COLUMN, RATE_COLUMN};
use polars::prelude::*;

const FX_KEY: &str = "fx_key";

/// `"<date>|<currency>"`, null when either part is null
fn fx_key() -> Expr {
    concat_str(
        [
            col(EXCHANGE_DATE_COLUMN).cast(DataType::String),
            col(CURRENCY_COLUMN).cast(DataType::String),
        ],
        "|",
        false,
    )
    .alias(FX_KEY)
}

/// `amount / rate_to_usd` at reduced precision, null if either side is null
pub fn usd_amount() -> Expr {
    (col("amount") / col(RATE_COLUMN))
        .cast(DataType::Float32)
        .alias(AMOUNT_USD_COLUMN)
}

fn warn_unknown_currencies(transactions: &DataFrame, known: &[String]) -> Result<()> {
    let seen = transactions
        .column(CURRENCY_COLUMN)?
        .cast(&DataType::String)?
        .unique_stable()?;
    for currency in seen.str()?.into_iter().flatten() {
        if !known.iter().any(|k| k == currency) {
            log::warn!(
                "Currency {} has no exchange rates; amount_usd will be null",
                currency
            );
        }
    }
    Ok(())
}

/// Join transactions to exchange rates on (date, currency) and compute
/// `amount_usd`.
///
/// Every transaction row is kept, in order. Rows with no matching rate get a
/// null `rate_to_usd` and `amount_usd`. The long table is consumed so it can
/// be freed once the join has run.
pub fn attach_usd_amounts(
    transactions: DataFrame,
    exchange: LongExchangeTable,
) -> Result<EnrichedTable> {
    if let Some((date, currency, matches)) = exchange.first_duplicate_key()? {
        return Err(EdaError::JoinCardinality {
            date,
            currency,
            matches,
        });
    }
    warn_unknown_currencies(&transactions, exchange.currencies())?;

    let rates = exchange
        .into_frame()
        .lazy()
        .filter(col(CURRENCY_COLUMN).is_not_null())
        .select([fx_key(), col(RATE_COLUMN)]);

    let args = JoinArgs {
        validation: JoinValidation::ManyToOne,
        ..JoinArgs::new(JoinType::Left)
    };
    let frame = transactions
        .lazy()
        .with_column(fx_key())
        .join(rates, [col(FX_KEY)], [col(FX_KEY)], args)
        .with_column(usd_amount())
        .drop([FX_KEY])
        .collect()?;

    let table = EnrichedTable::new(frame)?;
    log::info!(
        "Joined {} transactions to exchange rates ({} without a rate)",
        table.len(),
        table.rows_without_rate()?
    );
    Ok(table)
}

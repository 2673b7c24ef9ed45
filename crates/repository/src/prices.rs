use std::collections::HashMap;

use model::pricing::{price_lines, product_ids};
use model::{LineItemRequest, PricedLines};
use rust_decimal::Decimal;
use tokio_postgres::Transaction;
use uuid::Uuid;

use crate::RepositoryError;

/// Current unit price of every referenced product that exists.
async fn current_prices(
    tx: &Transaction<'_>,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Decimal>, RepositoryError> {
    let rows = tx
        .query("SELECT id, price FROM products WHERE id = ANY($1)", &[&ids])
        .await?;
    let mut prices = HashMap::with_capacity(rows.len());
    for row in rows {
        prices.insert(row.try_get("id")?, row.try_get("price")?);
    }
    Ok(prices)
}

/// Prices `lines` inside `tx`, so the snapshot belongs to the same
/// transaction as the rows written from it.
pub(crate) async fn price_in_tx(
    tx: &Transaction<'_>,
    lines: &[LineItemRequest],
) -> Result<PricedLines, RepositoryError> {
    let prices = current_prices(tx, &product_ids(lines)).await?;
    Ok(price_lines(lines, &prices)?)
}

//! Line-item pricing shared by orders and combos.
//!
//! Prices are resolved once per call into a `product_id -> unit price` map
//! by the storage layer (inside the creating transaction); everything here
//! is pure so the arithmetic can be checked without a database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A client-supplied line: which product and how many.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A line in an update payload. Lines with an `id` update that row in
/// place, lines without one are inserted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateLineItem {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub product_id: Uuid,
    pub quantity: i32,
}

impl UpdateLineItem {
    pub fn line(&self) -> LineItemRequest {
        LineItemRequest {
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

/// A line with its unit price snapshot and line total resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
    pub total_price: Decimal,
}

/// All priced lines of one parent, in request order, plus their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLines {
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("at least one item is required")]
    NoItems,
    #[error("quantity must be greater than 0 for product {product_id} (got {quantity})")]
    InvalidQuantity { product_id: Uuid, quantity: i32 },
    #[error("product {0} not found")]
    UnknownProduct(Uuid),
}

/// Rejects any line whose quantity is not strictly positive.
pub fn validate_quantities<'a, I>(lines: I) -> Result<(), PricingError>
where
    I: IntoIterator<Item = &'a LineItemRequest>,
{
    for line in lines {
        if line.quantity <= 0 {
            return Err(PricingError::InvalidQuantity {
                product_id: line.product_id,
                quantity: line.quantity,
            });
        }
    }
    Ok(())
}

/// Validates a creation payload: non-empty, every quantity positive.
pub fn validate_new_lines(lines: &[LineItemRequest]) -> Result<(), PricingError> {
    if lines.is_empty() {
        return Err(PricingError::NoItems);
    }
    validate_quantities(lines)
}

/// Distinct product ids in first-seen order, for a single price lookup.
pub fn product_ids<'a, I>(lines: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = &'a LineItemRequest>,
{
    let mut ids: Vec<Uuid> = Vec::new();
    for line in lines {
        if !ids.contains(&line.product_id) {
            ids.push(line.product_id);
        }
    }
    ids
}

pub fn line_total(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Prices every line against `prices` and accumulates the grand total.
///
/// Quantities are checked before any price is consulted, so a payload that
/// is both invalid and references an unknown product reports the quantity.
pub fn price_lines(
    lines: &[LineItemRequest],
    prices: &HashMap<Uuid, Decimal>,
) -> Result<PricedLines, PricingError> {
    validate_quantities(lines)?;

    let mut total = Decimal::ZERO;
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let price = *prices
            .get(&line.product_id)
            .ok_or(PricingError::UnknownProduct(line.product_id))?;
        let total_price = line_total(price, line.quantity);
        total += total_price;
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            price,
            total_price,
        });
    }

    Ok(PricedLines {
        lines: priced,
        total,
    })
}

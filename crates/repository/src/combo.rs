//! Combos: operator-defined product bundles.
//!
//! Same parent/line layout as orders with the same price snapshot rule.
//! Deleting a combo removes it for good; its lines go with it through the
//! foreign key cascade.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{
    Combo, ComboDetails, ComboItem, LineItemRequest, ListRequest, NewCombo, Page, PricedLine,
    UpdateComboRequest,
};
use rust_decimal::Decimal;
use tokio_postgres::Transaction;
use tracing::debug;
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::prices::price_in_tx;
use crate::rows::{self, COMBO_COLUMNS, COMBO_ITEM_COLUMNS};
use crate::RepositoryError;

#[async_trait]
pub trait ComboRepository: Send + Sync {
    async fn create(
        &self,
        combo: &NewCombo,
        items: &[LineItemRequest],
    ) -> Result<ComboDetails, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<ComboDetails, RepositoryError>;
    /// Search matches name and description.
    async fn list(&self, req: &ListRequest) -> Result<Page<Combo>, RepositoryError>;
    async fn update(
        &self,
        id: Uuid,
        req: &UpdateComboRequest,
    ) -> Result<ComboDetails, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgComboRepository {
    pool: Pool,
}

impl PgComboRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn insert_combo_tx(
        tx: &Transaction<'_>,
        combo: &NewCombo,
        total: Decimal,
    ) -> Result<Combo, RepositoryError> {
        let query = format!(
            "INSERT INTO combos (id, name, description, price, total_price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COMBO_COLUMNS}"
        );
        let row = tx
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &combo.name,
                    &combo.description,
                    &combo.price,
                    &total,
                ],
            )
            .await?;
        rows::combo(&row)
    }

    async fn insert_item_tx(
        tx: &Transaction<'_>,
        combo_id: Uuid,
        line: &PricedLine,
    ) -> Result<ComboItem, RepositoryError> {
        let query = format!(
            "INSERT INTO combo_items (id, combo_id, product_id, quantity, price, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COMBO_ITEM_COLUMNS}"
        );
        let row = tx
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &combo_id,
                    &line.product_id,
                    &line.quantity,
                    &line.price,
                    &line.total_price,
                ],
            )
            .await?;
        rows::combo_item(&row)
    }

    async fn update_item_tx(
        tx: &Transaction<'_>,
        combo_id: Uuid,
        item_id: Uuid,
        line: &PricedLine,
    ) -> Result<(), RepositoryError> {
        let updated = tx
            .execute(
                "UPDATE combo_items SET product_id = $3, quantity = $4, price = $5, \
                 total_price = $6, updated_at = now() WHERE id = $1 AND combo_id = $2",
                &[
                    &item_id,
                    &combo_id,
                    &line.product_id,
                    &line.quantity,
                    &line.price,
                    &line.total_price,
                ],
            )
            .await?;
        if updated == 0 {
            return Err(RepositoryError::not_found("combo item"));
        }
        Ok(())
    }

    async fn items_tx(tx: &Transaction<'_>, combo_id: Uuid) -> Result<Vec<ComboItem>, RepositoryError> {
        let query = format!(
            "SELECT {COMBO_ITEM_COLUMNS} FROM combo_items WHERE combo_id = $1 ORDER BY created_at, id"
        );
        let found = tx.query(query.as_str(), &[&combo_id]).await?;
        found.iter().map(rows::combo_item).collect()
    }
}

#[async_trait]
impl ComboRepository for PgComboRepository {
    async fn create(
        &self,
        combo: &NewCombo,
        items: &[LineItemRequest],
    ) -> Result<ComboDetails, RepositoryError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let priced = price_in_tx(&tx, items).await?;
        let combo = Self::insert_combo_tx(&tx, combo, priced.total).await?;

        let mut stored = Vec::with_capacity(priced.lines.len());
        for line in &priced.lines {
            stored.push(Self::insert_item_tx(&tx, combo.id, line).await?);
        }

        tx.commit().await?;
        debug!(combo_id = %combo.id, items = stored.len(), "combo stored");

        Ok(ComboDetails {
            combo,
            items: stored,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<ComboDetails, RepositoryError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let query = format!("SELECT {COMBO_COLUMNS} FROM combos WHERE id = $1");
        let combo = match tx.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::combo(&row)?,
            None => return Err(RepositoryError::not_found("combo")),
        };
        let items = Self::items_tx(&tx, id).await?;
        tx.commit().await?;

        Ok(ComboDetails { combo, items })
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Combo>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["name", "description"], req.search.as_deref());
        fetch_page(&client, COMBO_COLUMNS, "combos", "created_at DESC", &filter, req, rows::combo).await
    }

    async fn update(
        &self,
        id: Uuid,
        req: &UpdateComboRequest,
    ) -> Result<ComboDetails, RepositoryError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let updated = tx
            .execute(
                "UPDATE combos SET name = $2, description = $3, price = $4, updated_at = now() \
                 WHERE id = $1",
                &[&id, &req.name, &req.description, &req.price],
            )
            .await?;
        if updated == 0 {
            return Err(RepositoryError::not_found("combo"));
        }

        let lines: Vec<LineItemRequest> = req.items.iter().map(|item| item.line()).collect();
        let priced = price_in_tx(&tx, &lines).await?;
        for (item, line) in req.items.iter().zip(&priced.lines) {
            match item.id {
                Some(item_id) => Self::update_item_tx(&tx, id, item_id, line).await?,
                None => {
                    Self::insert_item_tx(&tx, id, line).await?;
                }
            }
        }

        let query = format!(
            "UPDATE combos SET total_price = (\
                 SELECT COALESCE(SUM(total_price), 0) FROM combo_items WHERE combo_id = $1) \
             WHERE id = $1 RETURNING {COMBO_COLUMNS}"
        );
        let combo = rows::combo(&tx.query_one(query.as_str(), &[&id]).await?)?;
        let items = Self::items_tx(&tx, id).await?;

        tx.commit().await?;
        Ok(ComboDetails { combo, items })
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM combos WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("combo"));
        }
        Ok(())
    }
}

//! Orders and their line items.
//!
//! Orders are soft-deleted: `deleted_at` is stamped on the order and its
//! items, and every read skips stamped rows.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{
    LineItemRequest, NewOrder, Order, OrderDetails, OrderItem, OrderListRequest, OrderStatus,
    Page, PricedLine, UpdateOrderRequest,
};
use rust_decimal::Decimal;
use tokio_postgres::Transaction;
use tracing::debug;
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::prices::price_in_tx;
use crate::rows::{self, ORDER_COLUMNS, ORDER_ITEM_COLUMNS};
use crate::RepositoryError;

/// # OrderRepository
///
/// Multi-row writes (create, update, delete) are atomic: they either commit
/// every row they touch or none.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Prices `items` from the current product prices and stores the order
    /// with the summed total.
    async fn create(
        &self,
        order: &NewOrder,
        items: &[LineItemRequest],
    ) -> Result<OrderDetails, RepositoryError>;

    async fn get_by_id(&self, id: Uuid) -> Result<OrderDetails, RepositoryError>;

    /// Search matches address and status; `user_id` narrows to one customer.
    async fn list(&self, req: &OrderListRequest) -> Result<Page<Order>, RepositoryError>;

    /// Replaces the parent fields, then updates lines carrying an id and
    /// inserts the rest. Lines absent from the request stay as they are.
    async fn update(
        &self,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<OrderDetails, RepositoryError>;

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// PostgreSQL implementation of [`OrderRepository`].
pub struct PgOrderRepository {
    pool: Pool,
}

impl PgOrderRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn insert_order_tx(
        tx: &Transaction<'_>,
        order: &NewOrder,
        total: Decimal,
    ) -> Result<Order, RepositoryError> {
        let query = format!(
            "INSERT INTO orders (id, user_id, total_price, delivery_status, status, longitude, \
             latitude, address_name) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = tx
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &order.user_id,
                    &total,
                    &order.delivery_status,
                    &OrderStatus::Pending.as_str(),
                    &order.longitude,
                    &order.latitude,
                    &order.address_name,
                ],
            )
            .await?;
        rows::order(&row)
    }

    async fn insert_item_tx(
        tx: &Transaction<'_>,
        order_id: Uuid,
        line: &PricedLine,
    ) -> Result<OrderItem, RepositoryError> {
        let query = format!(
            "INSERT INTO order_items (id, order_id, product_id, quantity, price, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ORDER_ITEM_COLUMNS}"
        );
        let row = tx
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &order_id,
                    &line.product_id,
                    &line.quantity,
                    &line.price,
                    &line.total_price,
                ],
            )
            .await?;
        rows::order_item(&row)
    }

    async fn update_item_tx(
        tx: &Transaction<'_>,
        order_id: Uuid,
        item_id: Uuid,
        line: &PricedLine,
    ) -> Result<(), RepositoryError> {
        let updated = tx
            .execute(
                "UPDATE order_items SET product_id = $3, quantity = $4, price = $5, \
                 total_price = $6, updated_at = now() \
                 WHERE id = $1 AND order_id = $2 AND deleted_at IS NULL",
                &[
                    &item_id,
                    &order_id,
                    &line.product_id,
                    &line.quantity,
                    &line.price,
                    &line.total_price,
                ],
            )
            .await?;
        if updated == 0 {
            return Err(RepositoryError::not_found("order item"));
        }
        Ok(())
    }

    async fn items_tx(tx: &Transaction<'_>, order_id: Uuid) -> Result<Vec<OrderItem>, RepositoryError> {
        let query = format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items \
             WHERE order_id = $1 AND deleted_at IS NULL ORDER BY created_at, id"
        );
        let found = tx.query(query.as_str(), &[&order_id]).await?;
        found.iter().map(rows::order_item).collect()
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(
        &self,
        order: &NewOrder,
        items: &[LineItemRequest],
    ) -> Result<OrderDetails, RepositoryError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let priced = price_in_tx(&tx, items).await?;
        let order = Self::insert_order_tx(&tx, order, priced.total).await?;

        let mut stored = Vec::with_capacity(priced.lines.len());
        for line in &priced.lines {
            stored.push(Self::insert_item_tx(&tx, order.id, line).await?);
        }

        tx.commit().await?;
        debug!(order_id = %order.id, items = stored.len(), "order stored");

        Ok(OrderDetails {
            order,
            items: stored,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<OrderDetails, RepositoryError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND deleted_at IS NULL");
        let order = match tx.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::order(&row)?,
            None => return Err(RepositoryError::not_found("order")),
        };
        let items = Self::items_tx(&tx, id).await?;
        tx.commit().await?;

        Ok(OrderDetails { order, items })
    }

    async fn list(&self, req: &OrderListRequest) -> Result<Page<Order>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new()
            .live()
            .search(&["address_name", "status"], req.list.search.as_deref())
            .eq("user_id", req.user_id);
        fetch_page(
            &client,
            ORDER_COLUMNS,
            "orders",
            "created_at DESC",
            &filter,
            &req.list,
            rows::order,
        )
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<OrderDetails, RepositoryError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let updated = tx
            .execute(
                "UPDATE orders SET user_id = $2, delivery_status = $3, status = $4, longitude = $5, \
                 latitude = $6, address_name = $7, updated_at = now() \
                 WHERE id = $1 AND deleted_at IS NULL",
                &[
                    &id,
                    &req.user_id,
                    &req.delivery_status,
                    &req.status.as_str(),
                    &req.longitude,
                    &req.latitude,
                    &req.address_name,
                ],
            )
            .await?;
        if updated == 0 {
            return Err(RepositoryError::not_found("order"));
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
            "UPDATE orders SET total_price = (\
                 SELECT COALESCE(SUM(total_price), 0) FROM order_items \
                 WHERE order_id = $1 AND deleted_at IS NULL) \
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        let order = rows::order(&tx.query_one(query.as_str(), &[&id]).await?)?;
        let items = Self::items_tx(&tx, id).await?;

        tx.commit().await?;
        Ok(OrderDetails { order, items })
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE orders SET status = $2, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {ORDER_COLUMNS}"
        );
        match client.query_opt(query.as_str(), &[&id, &status.as_str()]).await? {
            Some(row) => rows::order(&row),
            None => Err(RepositoryError::not_found("order")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let deleted = tx
            .execute(
                "UPDATE orders SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
                &[&id],
            )
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("order"));
        }
        tx.execute(
            "UPDATE order_items SET deleted_at = now() WHERE order_id = $1 AND deleted_at IS NULL",
            &[&id],
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

//! Order management.
//!
//! This module defines the [`OrderService`] trait and its implementation
//! [`OrderServiceImpl`]. The service rejects malformed payloads before the
//! repository is touched, so a rejected request never writes a row.

use async_trait::async_trait;
use model::pricing::{validate_new_lines, validate_quantities};
use model::{
    CreateOrderRequest, Order, OrderDetails, OrderListRequest, OrderStatus, Page,
    UpdateOrderRequest,
};
use repository::OrderRepository;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{validation, ServiceError};

/// Business operations on orders.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Validates, prices and atomically stores a new order with its items.
    ///
    /// # Errors
    /// [`ServiceError::Validation`] for an empty item list, a non-positive
    /// quantity or a missing user; [`ServiceError::NotFound`] when a product
    /// does not exist. No rows are written in either case.
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<OrderDetails, ServiceError>;

    async fn get_order(&self, id: Uuid) -> Result<OrderDetails, ServiceError>;

    async fn list_orders(&self, req: &OrderListRequest) -> Result<Page<Order>, ServiceError>;

    /// Replaces parent fields and updates or inserts the given items.
    async fn update_order(
        &self,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<OrderDetails, ServiceError>;

    /// Moves the order to `status`, one of `pending`, `confirmed`,
    /// `picked_up`, `delivered`.
    async fn change_status(&self, id: Uuid, status: &str) -> Result<Order, ServiceError>;

    /// Soft-deletes the order and its items.
    async fn delete_order(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// [`OrderService`] over any [`OrderRepository`].
pub struct OrderServiceImpl<R> {
    orders_repo: R,
}

impl<R> OrderServiceImpl<R>
where
    R: OrderRepository + Send + Sync,
{
    pub fn new(orders_repo: R) -> Self {
        Self { orders_repo }
    }

    fn validate_create(&self, req: &CreateOrderRequest) -> Result<(), ServiceError> {
        validation::reference("user_id", req.order.user_id)?;
        validate_new_lines(&req.items)?;
        Ok(())
    }

    fn validate_update(&self, req: &UpdateOrderRequest) -> Result<(), ServiceError> {
        validation::reference("user_id", req.user_id)?;
        let lines: Vec<_> = req.items.iter().map(|item| item.line()).collect();
        validate_quantities(&lines)?;
        Ok(())
    }
}

#[async_trait]
impl<R> OrderService for OrderServiceImpl<R>
where
    R: OrderRepository + Send + Sync,
{
    #[instrument(skip(self, req), fields(user_id = %req.order.user_id, items = req.items.len()))]
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<OrderDetails, ServiceError> {
        self.validate_create(req)?;

        let details = self.orders_repo.create(&req.order, &req.items).await?;
        info!(order_id = %details.order.id, total = %details.order.total_price, "order created");
        Ok(details)
    }

    #[instrument(skip(self))]
    async fn get_order(&self, id: Uuid) -> Result<OrderDetails, ServiceError> {
        Ok(self.orders_repo.get_by_id(id).await?)
    }

    #[instrument(skip(self, req))]
    async fn list_orders(&self, req: &OrderListRequest) -> Result<Page<Order>, ServiceError> {
        Ok(self.orders_repo.list(req).await?)
    }

    #[instrument(skip(self, req), fields(items = req.items.len()))]
    async fn update_order(
        &self,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<OrderDetails, ServiceError> {
        self.validate_update(req)?;

        let details = self.orders_repo.update(id, req).await?;
        info!(order_id = %id, total = %details.order.total_price, "order updated");
        Ok(details)
    }

    #[instrument(skip(self))]
    async fn change_status(&self, id: Uuid, status: &str) -> Result<Order, ServiceError> {
        let status: OrderStatus = status.parse().map_err(ServiceError::Validation)?;

        let order = self.orders_repo.set_status(id, status).await?;
        info!(order_id = %id, %status, "order status changed");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: Uuid) -> Result<(), ServiceError> {
        self.orders_repo.delete(id).await?;
        info!(order_id = %id, "order deleted");
        Ok(())
    }
}

//! Courier side of delivery: who carries which order, and what they earned.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{
    CourierAssignment, CourierAssignmentRequest, DeliveryHistory, DeliveryHistoryRequest,
    ListRequest, Page,
};
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::rows::{self, COURIER_ASSIGNMENT_COLUMNS, DELIVERY_HISTORY_COLUMNS};
use crate::RepositoryError;

#[async_trait]
pub trait CourierAssignmentRepository: Send + Sync {
    async fn create(
        &self,
        assignment: &CourierAssignmentRequest,
    ) -> Result<CourierAssignment, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<CourierAssignment, RepositoryError>;
    /// Search matches the assignment status.
    async fn list(&self, req: &ListRequest) -> Result<Page<CourierAssignment>, RepositoryError>;
    async fn update(
        &self,
        id: Uuid,
        assignment: &CourierAssignmentRequest,
    ) -> Result<CourierAssignment, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgCourierAssignmentRepository {
    pool: Pool,
}

impl PgCourierAssignmentRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourierAssignmentRepository for PgCourierAssignmentRepository {
    async fn create(
        &self,
        assignment: &CourierAssignmentRequest,
    ) -> Result<CourierAssignment, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO courier_assignments (id, order_id, courier_id, status) \
             VALUES ($1, $2, $3, $4) RETURNING {COURIER_ASSIGNMENT_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &assignment.order_id,
                    &assignment.courier_id,
                    &assignment.status,
                ],
            )
            .await?;
        rows::courier_assignment(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<CourierAssignment, RepositoryError> {
        let client = self.pool.get().await?;
        let query =
            format!("SELECT {COURIER_ASSIGNMENT_COLUMNS} FROM courier_assignments WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::courier_assignment(&row),
            None => Err(RepositoryError::not_found("courier assignment")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<CourierAssignment>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["status"], req.search.as_deref());
        fetch_page(
            &client,
            COURIER_ASSIGNMENT_COLUMNS,
            "courier_assignments",
            "assigned_at DESC",
            &filter,
            req,
            rows::courier_assignment,
        )
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        assignment: &CourierAssignmentRequest,
    ) -> Result<CourierAssignment, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE courier_assignments SET order_id = $2, courier_id = $3, status = $4, \
             updated_at = now() WHERE id = $1 RETURNING {COURIER_ASSIGNMENT_COLUMNS}"
        );
        match client
            .query_opt(
                query.as_str(),
                &[&id, &assignment.order_id, &assignment.courier_id, &assignment.status],
            )
            .await?
        {
            Some(row) => rows::courier_assignment(&row),
            None => Err(RepositoryError::not_found("courier assignment")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM courier_assignments WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("courier assignment"));
        }
        Ok(())
    }
}

/// Completed deliveries with the courier's earnings. Listing is
/// pagination only.
#[async_trait]
pub trait DeliveryHistoryRepository: Send + Sync {
    async fn create(&self, entry: &DeliveryHistoryRequest) -> Result<DeliveryHistory, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<DeliveryHistory, RepositoryError>;
    async fn list(&self, req: &ListRequest) -> Result<Page<DeliveryHistory>, RepositoryError>;
    async fn update(
        &self,
        id: Uuid,
        entry: &DeliveryHistoryRequest,
    ) -> Result<DeliveryHistory, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgDeliveryHistoryRepository {
    pool: Pool,
}

impl PgDeliveryHistoryRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryHistoryRepository for PgDeliveryHistoryRepository {
    async fn create(&self, entry: &DeliveryHistoryRequest) -> Result<DeliveryHistory, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO delivery_history (id, courier_id, order_id, earnings, delivered_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, now())) RETURNING {DELIVERY_HISTORY_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &entry.courier_id,
                    &entry.order_id,
                    &entry.earnings,
                    &entry.delivered_at,
                ],
            )
            .await?;
        rows::delivery_history(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<DeliveryHistory, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {DELIVERY_HISTORY_COLUMNS} FROM delivery_history WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::delivery_history(&row),
            None => Err(RepositoryError::not_found("delivery history entry")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<DeliveryHistory>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new();
        fetch_page(
            &client,
            DELIVERY_HISTORY_COLUMNS,
            "delivery_history",
            "delivered_at DESC",
            &filter,
            req,
            rows::delivery_history,
        )
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        entry: &DeliveryHistoryRequest,
    ) -> Result<DeliveryHistory, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE delivery_history SET courier_id = $2, order_id = $3, earnings = $4, \
             delivered_at = COALESCE($5, delivered_at) WHERE id = $1 \
             RETURNING {DELIVERY_HISTORY_COLUMNS}"
        );
        match client
            .query_opt(
                query.as_str(),
                &[
                    &id,
                    &entry.courier_id,
                    &entry.order_id,
                    &entry.earnings,
                    &entry.delivered_at,
                ],
            )
            .await?
        {
            Some(row) => rows::delivery_history(&row),
            None => Err(RepositoryError::not_found("delivery history entry")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM delivery_history WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("delivery history entry"));
        }
        Ok(())
    }
}

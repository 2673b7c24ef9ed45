use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{ListRequest, Page, Payment, PaymentRequest};
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::rows::{self, PAYMENT_COLUMNS};
use crate::RepositoryError;

/// Payment records attached to orders. Listing is pagination only.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &PaymentRequest) -> Result<Payment, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Payment, RepositoryError>;
    async fn list(&self, req: &ListRequest) -> Result<Page<Payment>, RepositoryError>;
    async fn update(&self, id: Uuid, payment: &PaymentRequest) -> Result<Payment, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgPaymentRepository {
    pool: Pool,
}

impl PgPaymentRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create(&self, payment: &PaymentRequest) -> Result<Payment, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO payments (id, user_id, order_id, is_paid, payment_method) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PAYMENT_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &payment.user_id,
                    &payment.order_id,
                    &payment.is_paid,
                    &payment.payment_method,
                ],
            )
            .await?;
        rows::payment(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Payment, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::payment(&row),
            None => Err(RepositoryError::not_found("payment")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Payment>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new();
        fetch_page(&client, PAYMENT_COLUMNS, "payments", "created_at DESC", &filter, req, rows::payment).await
    }

    async fn update(&self, id: Uuid, payment: &PaymentRequest) -> Result<Payment, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE payments SET user_id = $2, order_id = $3, is_paid = $4, payment_method = $5 \
             WHERE id = $1 RETURNING {PAYMENT_COLUMNS}"
        );
        match client
            .query_opt(
                query.as_str(),
                &[
                    &id,
                    &payment.user_id,
                    &payment.order_id,
                    &payment.is_paid,
                    &payment.payment_method,
                ],
            )
            .await?
        {
            Some(row) => rows::payment(&row),
            None => Err(RepositoryError::not_found("payment")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM payments WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("payment"));
        }
        Ok(())
    }
}

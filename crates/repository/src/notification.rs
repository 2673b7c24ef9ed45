use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{ListRequest, Notification, NotificationRequest, Page};
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::rows::{self, NOTIFICATION_COLUMNS};
use crate::RepositoryError;

/// In-app notifications addressed to a user; search matches the message.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &NotificationRequest) -> Result<Notification, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Notification, RepositoryError>;
    async fn list(&self, req: &ListRequest) -> Result<Page<Notification>, RepositoryError>;
    async fn update(
        &self,
        id: Uuid,
        notification: &NotificationRequest,
    ) -> Result<Notification, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgNotificationRepository {
    pool: Pool,
}

impl PgNotificationRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: &NotificationRequest) -> Result<Notification, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO notifications (id, user_id, message, is_read) VALUES ($1, $2, $3, $4) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &notification.user_id,
                    &notification.message,
                    &notification.is_read,
                ],
            )
            .await?;
        rows::notification(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Notification, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::notification(&row),
            None => Err(RepositoryError::not_found("notification")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Notification>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["message"], req.search.as_deref());
        fetch_page(
            &client,
            NOTIFICATION_COLUMNS,
            "notifications",
            "created_at DESC",
            &filter,
            req,
            rows::notification,
        )
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        notification: &NotificationRequest,
    ) -> Result<Notification, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE notifications SET user_id = $2, message = $3, is_read = $4 \
             WHERE id = $1 RETURNING {NOTIFICATION_COLUMNS}"
        );
        match client
            .query_opt(
                query.as_str(),
                &[&id, &notification.user_id, &notification.message, &notification.is_read],
            )
            .await?
        {
            Some(row) => rows::notification(&row),
            None => Err(RepositoryError::not_found("notification")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM notifications WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("notification"));
        }
        Ok(())
    }
}

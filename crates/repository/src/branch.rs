use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{Branch, BranchRequest, ListRequest, Page};
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::rows::{self, BRANCH_COLUMNS};
use crate::RepositoryError;

/// Restaurant branches; search matches name and address.
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn create(&self, branch: &BranchRequest) -> Result<Branch, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Branch, RepositoryError>;
    async fn list(&self, req: &ListRequest) -> Result<Page<Branch>, RepositoryError>;
    async fn update(&self, id: Uuid, branch: &BranchRequest) -> Result<Branch, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgBranchRepository {
    pool: Pool,
}

impl PgBranchRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchRepository for PgBranchRepository {
    async fn create(&self, branch: &BranchRequest) -> Result<Branch, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO branches (id, name, address, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {BRANCH_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &branch.name,
                    &branch.address,
                    &branch.latitude,
                    &branch.longitude,
                ],
            )
            .await?;
        rows::branch(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Branch, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {BRANCH_COLUMNS} FROM branches WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::branch(&row),
            None => Err(RepositoryError::not_found("branch")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Branch>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["name", "address"], req.search.as_deref());
        fetch_page(&client, BRANCH_COLUMNS, "branches", "created_at DESC", &filter, req, rows::branch).await
    }

    async fn update(&self, id: Uuid, branch: &BranchRequest) -> Result<Branch, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE branches SET name = $2, address = $3, latitude = $4, longitude = $5, \
             updated_at = now() WHERE id = $1 RETURNING {BRANCH_COLUMNS}"
        );
        match client
            .query_opt(
                query.as_str(),
                &[&id, &branch.name, &branch.address, &branch.latitude, &branch.longitude],
            )
            .await?
        {
            Some(row) => rows::branch(&row),
            None => Err(RepositoryError::not_found("branch")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM branches WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("branch"));
        }
        Ok(())
    }
}

use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{Banner, BannerRequest, ListRequest, Page};
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::rows::{self, BANNER_COLUMNS};
use crate::RepositoryError;

/// Promotional banners. Banners are never edited, only replaced.
#[async_trait]
pub trait BannerRepository: Send + Sync {
    async fn create(&self, banner: &BannerRequest) -> Result<Banner, RepositoryError>;
    /// Search matches the image URL.
    async fn list(&self, req: &ListRequest) -> Result<Page<Banner>, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgBannerRepository {
    pool: Pool,
}

impl PgBannerRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BannerRepository for PgBannerRepository {
    async fn create(&self, banner: &BannerRequest) -> Result<Banner, RepositoryError> {
        let client = self.pool.get().await?;
        let query =
            format!("INSERT INTO banners (id, image_url) VALUES ($1, $2) RETURNING {BANNER_COLUMNS}");
        let row = client
            .query_one(query.as_str(), &[&Uuid::new_v4(), &banner.image_url])
            .await?;
        rows::banner(&row)
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Banner>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["image_url"], req.search.as_deref());
        fetch_page(&client, BANNER_COLUMNS, "banners", "created_at DESC", &filter, req, rows::banner).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM banners WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("banner"));
        }
        Ok(())
    }
}

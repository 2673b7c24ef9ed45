//! Menu catalog: categories and the products priced from them.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{Category, CategoryRequest, ListRequest, Page, Product, ProductListRequest, ProductRequest};
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::rows::{self, CATEGORY_COLUMNS, PRODUCT_COLUMNS};
use crate::RepositoryError;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &CategoryRequest) -> Result<Category, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Category, RepositoryError>;
    async fn list(&self, req: &ListRequest) -> Result<Page<Category>, RepositoryError>;
    async fn update(&self, id: Uuid, category: &CategoryRequest) -> Result<Category, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgCategoryRepository {
    pool: Pool,
}

impl PgCategoryRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, category: &CategoryRequest) -> Result<Category, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING {CATEGORY_COLUMNS}"
        );
        let row = client
            .query_one(query.as_str(), &[&Uuid::new_v4(), &category.name])
            .await?;
        rows::category(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Category, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::category(&row),
            None => Err(RepositoryError::not_found("category")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Category>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["name"], req.search.as_deref());
        fetch_page(
            &client,
            CATEGORY_COLUMNS,
            "categories",
            "created_at DESC",
            &filter,
            req,
            rows::category,
        )
        .await
    }

    async fn update(&self, id: Uuid, category: &CategoryRequest) -> Result<Category, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE categories SET name = $2, updated_at = now() WHERE id = $1 \
             RETURNING {CATEGORY_COLUMNS}"
        );
        match client.query_opt(query.as_str(), &[&id, &category.name]).await? {
            Some(row) => rows::category(&row),
            None => Err(RepositoryError::not_found("category")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM categories WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("category"));
        }
        Ok(())
    }
}

/// # ProductRepository
///
/// Products are the price source for order and combo lines: whatever
/// `price` holds when a line is created is copied onto that line.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &ProductRequest) -> Result<Product, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Product, RepositoryError>;
    /// Search matches the name; `category_id` narrows to one category.
    async fn list(&self, req: &ProductListRequest) -> Result<Page<Product>, RepositoryError>;
    async fn update(&self, id: Uuid, product: &ProductRequest) -> Result<Product, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgProductRepository {
    pool: Pool,
}

impl PgProductRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &ProductRequest) -> Result<Product, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO products (id, category_id, name, description, price, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PRODUCT_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[
                    &Uuid::new_v4(),
                    &product.category_id,
                    &product.name,
                    &product.description,
                    &product.price,
                    &product.image_url,
                ],
            )
            .await?;
        rows::product(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Product, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::product(&row),
            None => Err(RepositoryError::not_found("product")),
        }
    }

    async fn list(&self, req: &ProductListRequest) -> Result<Page<Product>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new()
            .search(&["name"], req.list.search.as_deref())
            .eq("category_id", req.category_id);
        fetch_page(
            &client,
            PRODUCT_COLUMNS,
            "products",
            "created_at DESC",
            &filter,
            &req.list,
            rows::product,
        )
        .await
    }

    async fn update(&self, id: Uuid, product: &ProductRequest) -> Result<Product, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE products SET category_id = $2, name = $3, description = $4, price = $5, \
             image_url = $6, updated_at = now() WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );
        match client
            .query_opt(
                query.as_str(),
                &[
                    &id,
                    &product.category_id,
                    &product.name,
                    &product.description,
                    &product.price,
                    &product.image_url,
                ],
            )
            .await?
        {
            Some(row) => rows::product(&row),
            None => Err(RepositoryError::not_found("product")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM products WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("product"));
        }
        Ok(())
    }
}

//! Users (customers) and admins.

use async_trait::async_trait;
use deadpool_postgres::Pool;
use model::{Admin, AdminRequest, ListRequest, Page, User, UserRequest};
use uuid::Uuid;

use crate::filter::{fetch_page, ListFilter};
use crate::rows::{self, ADMIN_COLUMNS, USER_COLUMNS};
use crate::RepositoryError;

/// # UserRepository
///
/// Storage of customer accounts. The phone number is unique and is the
/// identity the OTP login resolves.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &UserRequest) -> Result<User, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<User, RepositoryError>;
    /// Lookup used after a confirmed OTP.
    async fn get_by_phone(&self, phone: &str) -> Result<User, RepositoryError>;
    /// Search matches email and phone.
    async fn list(&self, req: &ListRequest) -> Result<Page<User>, RepositoryError>;
    async fn update(&self, id: Uuid, user: &UserRequest) -> Result<User, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// PostgreSQL implementation of [`UserRepository`].
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &UserRequest) -> Result<User, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO users (id, name, sex, email, phone) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[&Uuid::new_v4(), &user.name, &user.sex, &user.email, &user.phone],
            )
            .await?;
        rows::user(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::user(&row),
            None => Err(RepositoryError::not_found("user")),
        }
    }

    async fn get_by_phone(&self, phone: &str) -> Result<User, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1");
        match client.query_opt(query.as_str(), &[&phone]).await? {
            Some(row) => rows::user(&row),
            None => Err(RepositoryError::not_found("user")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<User>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["email", "phone"], req.search.as_deref());
        fetch_page(&client, USER_COLUMNS, "users", "created_at DESC", &filter, req, rows::user).await
    }

    async fn update(&self, id: Uuid, user: &UserRequest) -> Result<User, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE users SET name = $2, sex = $3, email = $4, phone = $5, updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        match client
            .query_opt(
                query.as_str(),
                &[&id, &user.name, &user.sex, &user.email, &user.phone],
            )
            .await?
        {
            Some(row) => rows::user(&row),
            None => Err(RepositoryError::not_found("user")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM users WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("user"));
        }
        Ok(())
    }
}

/// # AdminRepository
///
/// Back-office operator accounts. Admins log in with the same OTP flow as
/// customers, resolved through their own unique phone.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, admin: &AdminRequest) -> Result<Admin, RepositoryError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Admin, RepositoryError>;
    async fn get_by_phone(&self, phone: &str) -> Result<Admin, RepositoryError>;
    async fn list(&self, req: &ListRequest) -> Result<Page<Admin>, RepositoryError>;
    async fn update(&self, id: Uuid, admin: &AdminRequest) -> Result<Admin, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

pub struct PgAdminRepository {
    pool: Pool,
}

impl PgAdminRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn create(&self, admin: &AdminRequest) -> Result<Admin, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "INSERT INTO admins (id, name, email, phone) VALUES ($1, $2, $3, $4) \
             RETURNING {ADMIN_COLUMNS}"
        );
        let row = client
            .query_one(
                query.as_str(),
                &[&Uuid::new_v4(), &admin.name, &admin.email, &admin.phone],
            )
            .await?;
        rows::admin(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Admin, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1");
        match client.query_opt(query.as_str(), &[&id]).await? {
            Some(row) => rows::admin(&row),
            None => Err(RepositoryError::not_found("admin")),
        }
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Admin, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE phone = $1");
        match client.query_opt(query.as_str(), &[&phone]).await? {
            Some(row) => rows::admin(&row),
            None => Err(RepositoryError::not_found("admin")),
        }
    }

    async fn list(&self, req: &ListRequest) -> Result<Page<Admin>, RepositoryError> {
        let client = self.pool.get().await?;
        let filter = ListFilter::new().search(&["email", "phone"], req.search.as_deref());
        fetch_page(&client, ADMIN_COLUMNS, "admins", "created_at DESC", &filter, req, rows::admin).await
    }

    async fn update(&self, id: Uuid, admin: &AdminRequest) -> Result<Admin, RepositoryError> {
        let client = self.pool.get().await?;
        let query = format!(
            "UPDATE admins SET name = $2, email = $3, phone = $4, updated_at = now() \
             WHERE id = $1 RETURNING {ADMIN_COLUMNS}"
        );
        match client
            .query_opt(query.as_str(), &[&id, &admin.name, &admin.email, &admin.phone])
            .await?
        {
            Some(row) => rows::admin(&row),
            None => Err(RepositoryError::not_found("admin")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM admins WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::not_found("admin"));
        }
        Ok(())
    }
}

//! # Data Repository Layer
//!
//! Repository traits and PostgreSQL implementations for every entity of the
//! food-delivery backend. Each Pg repository borrows connections from a shared
//! `deadpool_postgres::Pool`; parent/child aggregates (orders, combos) run their
//! whole write inside one transaction on one pooled connection.

use deadpool_postgres::PoolError;
use model::PricingError;
use thiserror::Error;
use tokio_postgres::error::SqlState;

pub mod banner;
pub mod branch;
pub mod catalog;
pub mod combo;
pub mod courier;
pub mod filter;
pub mod notification;
pub mod order;
pub mod payment;
pub mod people;

mod prices;
mod rows;

pub use banner::{BannerRepository, PgBannerRepository};
pub use branch::{BranchRepository, PgBranchRepository};
pub use catalog::{CategoryRepository, PgCategoryRepository, PgProductRepository, ProductRepository};
pub use combo::{ComboRepository, PgComboRepository};
pub use courier::{
    CourierAssignmentRepository, DeliveryHistoryRepository, PgCourierAssignmentRepository,
    PgDeliveryHistoryRepository,
};
pub use filter::ListFilter;
pub use notification::{NotificationRepository, PgNotificationRepository};
pub use order::{OrderRepository, PgOrderRepository};
pub use payment::{PaymentRepository, PgPaymentRepository};
pub use people::{AdminRepository, PgAdminRepository, PgUserRepository, UserRepository};

use std::sync::Arc;

use deadpool_postgres::Pool;

/// # RepositoryError
///
/// Error conditions raised by the data storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database-related errors, wrapping the underlying PostgreSQL error.
    #[error("Database error: {0}")]
    Db(tokio_postgres::Error),
    /// A connection could not be taken from the pool.
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
    /// The write was rejected by a table constraint (unique phone, check, a
    /// row that is still referenced, ...).
    #[error("Constraint violation: {0}")]
    Constraint(String),
    /// No row matched the requested identity.
    #[error("{0} not found")]
    NotFound(String),
    /// Line items could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
    /// A stored value could not be mapped back onto the domain type.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl From<tokio_postgres::Error> for RepositoryError {
    fn from(err: tokio_postgres::Error) -> Self {
        let Some(code) = err.code() else {
            return RepositoryError::Db(err);
        };
        let message = err
            .as_db_error()
            .map(|db| db.message().to_string())
            .unwrap_or_else(|| err.to_string());

        if *code == SqlState::FOREIGN_KEY_VIOLATION {
            let detail = err.as_db_error().and_then(|db| db.detail());
            return foreign_key_violation(detail, message);
        }
        let constraint = *code == SqlState::UNIQUE_VIOLATION
            || *code == SqlState::CHECK_VIOLATION
            || *code == SqlState::NOT_NULL_VIOLATION;
        if constraint {
            return RepositoryError::Constraint(message);
        }
        RepositoryError::Db(err)
    }
}

/// Postgres reports a foreign-key failure with a detail such as
/// `Key (user_id)=(...) is not present in table "users".` on insert/update,
/// or `... is still referenced from table "orders".` on delete.
/// The first names a missing identity, the second a conflicting write.
fn foreign_key_violation(detail: Option<&str>, message: String) -> RepositoryError {
    match detail {
        Some(detail) if detail.contains("is not present in table") => {
            let column = detail
                .strip_prefix("Key (")
                .and_then(|rest| rest.split_once(')'))
                .map(|(column, _)| column)
                .unwrap_or("referenced row");
            RepositoryError::NotFound(format!("{column} reference"))
        }
        _ => RepositoryError::Constraint(message),
    }
}

impl RepositoryError {
    pub(crate) fn not_found(entity: &str) -> Self {
        RepositoryError::NotFound(entity.to_string())
    }
}

/// Repositories of the plain CRUD entities, shared by the HTTP handlers.
///
/// Orders and combos are reached through their services instead.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub branches: Arc<dyn BranchRepository>,
    pub banners: Arc<dyn BannerRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub courier_assignments: Arc<dyn CourierAssignmentRepository>,
    pub delivery_history: Arc<dyn DeliveryHistoryRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: Pool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            admins: Arc::new(PgAdminRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            branches: Arc::new(PgBranchRepository::new(pool.clone())),
            banners: Arc::new(PgBannerRepository::new(pool.clone())),
            payments: Arc::new(PgPaymentRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            courier_assignments: Arc::new(PgCourierAssignmentRepository::new(pool.clone())),
            delivery_history: Arc::new(PgDeliveryHistoryRepository::new(pool)),
        }
    }
}

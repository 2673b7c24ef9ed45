//! Business logic layer.
//!
//! Services validate input before any storage call, then delegate to the
//! repositories, which own transactions. Every failure is reported as a
//! [`ServiceError`], whose variants line up one-to-one with the error codes
//! the HTTP layer exposes.

use cache::CacheError;
use model::PricingError;
use repository::RepositoryError;
use thiserror::Error;

pub mod auth;
pub mod combo;
pub mod order;
pub mod sms;
pub mod validation;

pub use auth::{AuthService, AuthServiceImpl};
pub use combo::{ComboService, ComboServiceImpl};
pub use order::{OrderService, OrderServiceImpl};
pub use sms::{LogSmsSender, SmsSender};

/// The main error type for all service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request is structurally or semantically invalid. Nothing was written.
    #[error("{0}")]
    Validation(String),
    /// A referenced entity does not exist (or is soft-deleted).
    #[error("{0}")]
    NotFound(String),
    /// A presented credential did not match.
    #[error("{0}")]
    Unauthorized(String),
    /// The database failed.
    #[error("Storage error: {0}")]
    Storage(#[source] RepositoryError),
    /// The OTP cache failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl From<PricingError> for ServiceError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::UnknownProduct(_) => ServiceError::NotFound(err.to_string()),
            PricingError::NoItems | PricingError::InvalidQuantity { .. } => {
                ServiceError::Validation(err.to_string())
            }
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ServiceError::NotFound(err.to_string()),
            RepositoryError::Pricing(pricing) => pricing.into(),
            RepositoryError::Constraint(message) => ServiceError::Validation(message),
            other => ServiceError::Storage(other),
        }
    }
}

//! Short-lived key/value storage for one-time login codes.
//!
//! The OTP workflow needs a write with a time-to-live, a read, and an atomic
//! compare-and-delete that consumes a code at most once. Production runs on
//! [`RedisOtpStore`]; tests and local runs without Redis use
//! [`InMemoryOtpStore`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod redis_store;

pub use memory::InMemoryOtpStore;
pub use redis_store::RedisOtpStore;

#[derive(Debug, Error)]
pub enum CacheError {
    /// The Redis server could not be reached or rejected the command.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Expiring key/value store holding issued OTP codes keyed by phone number.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value and restarting its lifetime.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Returns the live value under `key`; expired or missing keys read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Deletes the value under `key` only if it equals `expected`, as one
    /// atomic step. A mismatch leaves the value in place.
    async fn take_if_matches(&self, key: &str, expected: &str) -> Result<CodeCheck, CacheError>;
}

/// Outcome of [`OtpStore::take_if_matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Nothing is stored under the key, or it expired.
    Missing,
    /// A different value is stored; it was kept.
    Mismatch,
    /// The value matched and has been removed.
    Consumed,
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{CacheError, CodeCheck, OtpStore};

/// Process-local [`OtpStore`] with lazy expiry: stale entries are dropped
/// when they are next read.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOtpStore {
    inner: Arc<RwLock<HashMap<String, (String, Instant)>>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        {
            let map = self.inner.read().await;
            match map.get(key) {
                Some((value, expires_at)) if *expires_at > Instant::now() => {
                    return Ok(Some(value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }
        let mut map = self.inner.write().await;
        if map.get(key).is_some_and(|(_, expires_at)| *expires_at <= Instant::now()) {
            map.remove(key);
        }
        Ok(None)
    }

    async fn take_if_matches(&self, key: &str, expected: &str) -> Result<CodeCheck, CacheError> {
        let mut map = self.inner.write().await;
        let check = match map.get(key) {
            None => return Ok(CodeCheck::Missing),
            Some((_, expires_at)) if *expires_at <= Instant::now() => CodeCheck::Missing,
            Some((value, _)) if value != expected => return Ok(CodeCheck::Mismatch),
            Some(_) => CodeCheck::Consumed,
        };
        map.remove(key);
        Ok(check)
    }
}

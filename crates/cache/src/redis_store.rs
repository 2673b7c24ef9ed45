use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Script};
use tracing::debug;

use crate::{CacheError, CodeCheck, OtpStore};

/// GET, compare, DEL on match; runs atomically on the server.
/// Replies 0 for a missing key, 1 for a mismatch, 2 once consumed.
static TAKE_IF_MATCHES: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
        local stored = redis.call('GET', KEYS[1])
        if not stored then
            return 0
        end
        if stored ~= ARGV[1] then
            return 1
        end
        redis.call('DEL', KEYS[1])
        return 2
        ",
    )
});

fn code_check(reply: i64) -> CodeCheck {
    match reply {
        2 => CodeCheck::Consumed,
        1 => CodeCheck::Mismatch,
        _ => CodeCheck::Missing,
    }
}

/// Redis-backed [`OtpStore`]. Keys are namespaced with a fixed prefix.
///
/// Each command opens a multiplexed connection from the client; the client
/// itself is created once at start-up and does not connect until first use.
#[derive(Clone)]
pub struct RedisOtpStore {
    client: redis::Client,
    prefix: String,
}

impl RedisOtpStore {
    pub fn new(client: redis::Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// Parses `url` without connecting.
    pub fn open(url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        Ok(Self::new(redis::Client::open(url)?, prefix))
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // SETEX takes whole seconds and rejects zero.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(self.key(key), value, seconds).await?;
        debug!(ttl_secs = seconds, "otp stored");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn take_if_matches(&self, key: &str, expected: &str) -> Result<CodeCheck, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let reply: i64 = TAKE_IF_MATCHES
            .key(self.key(key))
            .arg(expected)
            .invoke_async(&mut conn)
            .await?;
        Ok(code_check(reply))
    }
}

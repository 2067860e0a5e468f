//! Redis-backed copy of the last successfully fetched feed.
//!
//! Every operation degrades gracefully: when Redis is not configured or not reachable
//! the failure is logged and reads return `None`, writes return `false`. The shell is
//! fully functional without Redis; it just loses the fallback copy.
//!
//! Key schema:
//! - `jb:v1:feed:{sha256(feed_url)}`: raw CSV text, TTL configurable
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

const KEY_PREFIX: &str = "jb:v1:";

pub struct FeedCache {
    client: Option<redis::Client>,
    ttl_secs: u64,
}

impl FeedCache {
    /// A `None` URL, or one the client rejects, yields a cache that always misses.
    pub fn new(url: Option<&str>, ttl_secs: u64) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, cache disabled"))
                .ok()
        });
        Self { client, ttl_secs }
    }

    /// Send a PING. Returns `true` if Redis is reachable.
    pub async fn is_available(&self) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

    pub async fn load(&self, feed_url: &str) -> Option<String> {
        let key = feed_key(feed_url);
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(&key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GET failed"))
            .ok()?;
        debug!(key, hit = value.is_some(), "feed cache lookup");
        value
    }

    pub async fn store(&self, feed_url: &str, text: &str) -> bool {
        let key = feed_key(feed_url);
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        conn.set_ex::<_, _, ()>(&key, text, self.ttl_secs)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SETEX failed"))
            .is_ok()
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }
}

fn feed_key(feed_url: &str) -> String {
    let hash = Sha256::digest(feed_url.as_bytes());
    format!("{KEY_PREFIX}feed:{hash:x}")
}

// src/services/cache.rs
// DOCUMENTATION: In-memory TTL cache for read-heavy catalog responses
// PURPOSE: Serve category listings without a database round trip

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry {
    json: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe cache of serialized JSON values
pub struct ResponseCache {
    store: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Key for the subcategory listing of one category
    pub fn subcategories_key(category_type: &str) -> String {
        format!("categories:{}:subcategories", category_type)
    }

    /// Get and decode a cached value
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                serde_json::from_str(&entry.json).ok()
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Store a value with the default TTL; unserializable values are skipped
    pub async fn set<T: Serialize>(&self, key: String, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Not caching {}: {}", key, e);
                return;
            }
        };

        let mut store = self.store.write().await;
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, self.ttl.as_secs());
        store.insert(
            key,
            CacheEntry {
                json,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every entry whose key starts with `prefix`
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|key, _| !key.starts_with(prefix));
        log::debug!(
            "Cache invalidated {} entries with prefix {}",
            before - store.len(),
            prefix
        );
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Periodically remove expired cache entries and idle rate-limit keys
pub fn start_cleanup_task(
    cache: Arc<ResponseCache>,
    limiter: Arc<crate::services::OtpRateLimiter>,
    interval_seconds: u64,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
            limiter.cleanup();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = ResponseCache::new(60);
        cache.set("k".to_string(), &vec![1, 2, 3]).await;

        let value: Option<Vec<i32>> = cache.get("k").await;
        assert_eq!(value, Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<i32>>("missing").await, None);
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = ResponseCache::new(1);
        cache.set("k".to_string(), &"v").await;
        assert!(cache.get::<String>("k").await.is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(cache.get::<String>("k").await.is_none());

        cache.cleanup().await;
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_invalidate_prefix() {
        let cache = ResponseCache::new(60);
        cache
            .set(ResponseCache::subcategories_key("Beach_Life"), &1)
            .await;
        cache
            .set(ResponseCache::subcategories_key("City_Life"), &2)
            .await;
        cache.set("other".to_string(), &3).await;

        cache.invalidate_prefix("categories:").await;

        let stats = cache.stats().await;
        assert_eq!(stats.active_entries, 1);
        assert_eq!(cache.get::<i32>("other").await, Some(3));
    }
}

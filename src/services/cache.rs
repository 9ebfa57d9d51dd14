// src/services/cache.rs
// DOCUMENTATION: In-memory cache for upstream places responses
// PURPOSE: Reduce Geoapify API calls by caching normalized search results

use crate::models::Place;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry {
    data: Vec<Place>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Vec<Place>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe in-memory cache with TTL
/// DOCUMENTATION: TTL counts from insertion and is refreshed only by
/// re-insertion; reads check expiry themselves rather than trusting the
/// background sweep to have run
pub struct PlacesCache {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl PlacesCache {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Generate cache key from resolved coordinates and category filter
    /// DOCUMENTATION: Uses raw float formatting, so two geocodes of the same
    /// city that differ in a late decimal produce distinct entries. Accepted
    /// trade-off: hit rate suffers slightly, correctness does not.
    pub fn generate_key(lat: f64, lng: f64, categories: &str) -> String {
        format!("places_{}_{}_{}", lat, lng, categories)
    }

    /// Get cached value, treating expired entries as misses
    pub async fn get(&self, key: &str) -> Option<Vec<Place>> {
        let store = self.store.read().await;

        if let Some(entry) = store.get(key) {
            if !entry.is_expired() {
                log::debug!("Cache HIT for key: {}", key);
                return Some(entry.data.clone());
            } else {
                log::debug!("Cache EXPIRED for key: {}", key);
            }
        } else {
            log::debug!("Cache MISS for key: {}", key);
        }

        None
    }

    /// Set cached value with default TTL
    pub async fn set(&self, key: String, value: Vec<Place>) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Set cached value with custom TTL
    pub async fn set_with_ttl(&self, key: String, value: Vec<Place>, ttl: Duration) {
        let mut store = self.store.write().await;
        store.insert(key.clone(), CacheEntry::new(value, ttl));
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
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

    /// Number of entries currently held, expired ones included
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries on a fixed interval,
/// independent of read/write traffic
pub fn start_cleanup_task(cache: Arc<PlacesCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

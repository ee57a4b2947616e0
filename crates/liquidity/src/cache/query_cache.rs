//! Process-wide query cache with per-resource staleness, using moka.
//!
//! Entries expire after their key's stale time. Explicit invalidation is the
//! only other way an entry leaves the cache. An entry marked stale stays
//! readable through [`QueryCache::get`] but is refetched by the next
//! [`QueryCache::get_or_fetch`]. Concurrent fetches for the same
//! key are coalesced: one request runs, every caller gets its result.

use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;
use moka::future::Cache;
use moka::Expiry;

use crate::errors::{Error, Result};

use super::query_key::QueryKey;

type CachedValue = Arc<dyn Any + Send + Sync>;

/// Expires every entry after its key's stale time, measured from the last write.
struct StaleAfter;

impl Expiry<QueryKey, CachedValue> for StaleAfter {
    fn expire_after_create(
        &self,
        key: &QueryKey,
        _value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(key.stale_time())
    }

    fn expire_after_update(
        &self,
        key: &QueryKey,
        _value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(key.stale_time())
    }
}

pub struct QueryCache {
    entries: Cache<QueryKey, CachedValue>,
    stale: Mutex<HashSet<QueryKey>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .expire_after(StaleAfter)
                .build(),
            stale: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the fresh cached value for `key`, or runs `fetch` and caches
    /// its result. Failed fetches are not cached.
    pub async fn get_or_fetch<T, Fut>(&self, key: QueryKey, fetch: Fut) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T>>,
    {
        if self.take_stale(key) {
            debug!("[QueryCache] Refetching stale {}", key);
            self.entries.invalidate(&key).await;
        }

        let init = async move {
            debug!("[QueryCache] Fetching {}", key);
            fetch.await.map(|value| Arc::new(value) as CachedValue)
        };

        let cached = self
            .entries
            .try_get_with(key, init)
            .await
            .map_err(|e: Arc<Error>| (*e).clone())?;

        Self::downcast(key, cached)
    }

    pub async fn get<T>(&self, key: QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let cached = self.entries.get(&key).await?;
        Self::downcast(key, cached).ok()
    }

    pub async fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.take_stale(key);
        self.insert(key, value).await;
    }

    /// Keeps the cached value readable but makes the next
    /// [`get_or_fetch`](Self::get_or_fetch) go to the network.
    pub fn mark_stale(&self, key: QueryKey) {
        if self.entries.contains_key(&key) {
            debug!("[QueryCache] Marking {} stale", key);
            self.stale_keys().insert(key);
        }
    }

    pub fn is_stale(&self, key: QueryKey) -> bool {
        self.stale_keys().contains(&key)
    }

    /// Applies `apply` to the cached value in place. Returns false when there
    /// was nothing cached for `key`.
    pub async fn update<T, F>(&self, key: QueryKey, apply: F) -> bool
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(&mut T),
    {
        match self.get::<T>(key).await {
            Some(mut value) => {
                apply(&mut value);
                self.insert(key, value).await;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: QueryKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub async fn invalidate(&self, key: QueryKey) {
        debug!("[QueryCache] Invalidating {}", key);
        self.take_stale(key);
        self.entries.invalidate(&key).await;
    }

    pub async fn invalidate_many(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(*key).await;
        }
    }

    pub fn invalidate_all(&self) {
        debug!("[QueryCache] Invalidating all entries");
        self.stale_keys().clear();
        self.entries.invalidate_all();
    }

    async fn insert<T>(&self, key: QueryKey, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.entries.insert(key, Arc::new(value) as CachedValue).await;
    }

    fn take_stale(&self, key: QueryKey) -> bool {
        self.stale_keys().remove(&key)
    }

    fn stale_keys(&self) -> MutexGuard<'_, HashSet<QueryKey>> {
        self.stale.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn downcast<T>(key: QueryKey, cached: CachedValue) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        cached
            .downcast::<T>()
            .map(|value| value.as_ref().clone())
            .map_err(|_| Error::Unexpected(format!("Cached value for {} has the wrong type", key)))
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe wrapper for QueryCache
pub type SharedQueryCache = Arc<QueryCache>;

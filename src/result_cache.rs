//! Read-through memoization over a [`CacheStore`].
//!
//! Successful results are serialized with `serde_json` and written back with
//! the caller's TTL. Failures are returned untouched and never stored, so a
//! transient upstream outage does not outlive the outage itself. Store
//! failures degrade to direct computation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{cache::CacheStore, cache_keys::CacheKey};

#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        ResultCache { store }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Returns the cached value for `key` or runs `fetch_fn` and caches its
    /// success for `ttl`. A zero `ttl` always recomputes.
    pub async fn cached<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        fetch_fn: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if ttl.is_zero() || !key.is_cacheable() {
            return fetch_fn().await;
        }

        let key = key.to_string();

        match self.store.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    debug!("Cache hit: {}", key);
                    return Ok(value);
                },
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    if let Err(e) = self.store.delete(&key).await {
                        warn!("Cache delete failed for {}: {}", key, e);
                    }
                },
            },
            Ok(None) => debug!("Cache miss: {}", key),
            Err(e) => warn!("Cache read failed for {}, bypassing: {}", key, e),
        }

        let value = fetch_fn().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = self.store.set(&key, bytes, ttl).await {
                    warn!("Cache write failed for {}: {}", key, e);
                }
            },
            Err(e) => warn!("Result for {} is not serializable: {}", key, e),
        }

        Ok(value)
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{CacheError, MemoryStore},
        cache_keys::PRICE,
        error::Error,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn memory_cache() -> ResultCache {
        ResultCache::new(Arc::new(MemoryStore::new(64)))
    }

    struct UnreachableStore;

    #[async_trait]
    impl CacheStore for UnreachableStore {
        async fn get(&self, _: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Unavailable(String::from("connection refused")))
        }

        async fn set(
            &self,
            _: &str,
            _: Vec<u8>,
            _: Duration,
        ) -> Result<(), CacheError> {
            Err(CacheError::Unavailable(String::from("connection refused")))
        }

        async fn delete(&self, _: &str) -> Result<bool, CacheError> {
            Err(CacheError::Unavailable(String::from("connection refused")))
        }

        async fn clear(&self, _: &str) -> Result<usize, CacheError> {
            Err(CacheError::Unavailable(String::from("connection refused")))
        }

        async fn entry_count(&self) -> Result<usize, CacheError> {
            Err(CacheError::Unavailable(String::from("connection refused")))
        }
    }

    #[tokio::test]
    async fn test_cached_miss_then_hit() {
        let cache = memory_cache();
        let key = CacheKey::new(PRICE, "current_price");
        let ttl = Duration::from_secs(60);

        let result: Result<i32, Error> =
            cache.cached(&key, ttl, || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);

        let result: Result<i32, Error> = cache
            .cached(&key, ttl, || async {
                panic!("should not be called on cache hit")
            })
            .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = memory_cache();
        let key = CacheKey::new(PRICE, "current_price");
        let ttl = Duration::from_secs(60);
        let calls = AtomicU32::new(0);

        let first: Result<i32, Error> = cache
            .cached(&key, ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::TaskError(String::from("provider down")))
            })
            .await;
        assert!(first.is_err());

        let second: Result<i32, Error> = cache
            .cached(&key, ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(second.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_never_caches() {
        let cache = memory_cache();
        let key = CacheKey::new(PRICE, "current_price");
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let result: Result<u32, Error> = cache
                .cached(&key, Duration::ZERO, || async {
                    Ok(calls.fetch_add(1, Ordering::SeqCst))
                })
                .await;
            assert!(result.is_ok());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.store().entry_count().await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_expiry() {
        let cache = memory_cache();
        let key = CacheKey::new(PRICE, "current_price");
        let ttl = Duration::from_secs(15);

        let first: Result<i32, Error> =
            cache.cached(&key, ttl, || async { Ok(1) }).await;
        assert_eq!(first.unwrap(), 1);

        tokio::time::advance(Duration::from_secs(10)).await;
        let second: Result<i32, Error> =
            cache.cached(&key, ttl, || async { Ok(2) }).await;
        assert_eq!(second.unwrap(), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        let third: Result<i32, Error> =
            cache.cached(&key, ttl, || async { Ok(3) }).await;
        assert_eq!(third.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_arguments_select_distinct_entries() {
        let cache = memory_cache();
        let ttl = Duration::from_secs(60);

        for limit in [5, 10] {
            let key = CacheKey::new(PRICE, "history").kwarg("limit", &limit);
            let result: Result<i32, Error> =
                cache.cached(&key, ttl, || async move { Ok(limit) }).await;
            assert_eq!(result.unwrap(), limit);
        }

        let key = CacheKey::new(PRICE, "history").kwarg("limit", &5);
        let result: Result<i32, Error> =
            cache.cached(&key, ttl, || async { Ok(-1) }).await;
        assert_eq!(result.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_unreachable_store_degrades_to_direct_computation() {
        let cache = ResultCache::new(Arc::new(UnreachableStore));
        let key = CacheKey::new(PRICE, "current_price");
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let result: Result<String, Error> = cache
                .cached(&key, Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(String::from("fresh"))
                })
                .await;
            assert_eq!(result.unwrap(), "fresh");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new(64));
        let cache = ResultCache::new(store.clone());
        let key = CacheKey::new(PRICE, "current_price");
        store
            .set(&key.to_string(), b"not json".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        let result: Result<i32, Error> = cache
            .cached(&key, Duration::from_secs(60), || async { Ok(9) })
            .await;
        assert_eq!(result.unwrap(), 9);
        assert_eq!(
            store.get(&key.to_string()).await.unwrap(),
            Some(b"9".to_vec())
        );
    }
}

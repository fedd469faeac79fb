use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::helpers::glob_match;

/// Longest lifetime an entry can get; larger TTLs are capped to it.
pub const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 3_600);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache store unreachable: {0}")]
    Unavailable(String),
}

/// TTL-keyed byte store. Entries are disposable: callers must be able to
/// recompute anything they read from here.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` is a miss, including reads at or after the entry expiry.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Overwrites any existing entry for `key`.
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Removes every key matching the glob `pattern`, returning the count.
    async fn clear(&self, pattern: &str) -> Result<usize, CacheError>;

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        Ok(0)
    }

    async fn entry_count(&self) -> Result<usize, CacheError>;
}

/// A cache entry with expiration time
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Vec<u8>,
    pub expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process store shared by every worker.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl MemoryStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    fn make_room(entries: &mut HashMap<String, CacheEntry>, limit: usize) {
        let now = Instant::now();
        entries.retain(|_, entry| entry.is_live(now));

        while entries.len() >= limit {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.to_owned());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                },
                None => break,
            }
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.read().await;
        if let Some(entry) = entries.get(key) {
            if entry.is_live(Instant::now()) {
                return Ok(Some(entry.value.clone()));
            }
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        if ttl.is_zero() {
            entries.remove(key);
            return Ok(());
        }

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            Self::make_room(&mut entries, self.max_entries);
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl.min(MAX_TTL))
            .unwrap_or(now + Duration::from_secs(3_600));

        entries.insert(key.to_owned(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }

    async fn clear(&self, pattern: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !glob_match(pattern, key));
        Ok(before - entries.len())
    }

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        Ok(before - entries.len())
    }

    async fn entry_count(&self) -> Result<usize, CacheError> {
        Ok(self.entries.read().await.len())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use sieve_cache::SieveCache;
use tokio::sync::Mutex;

use crate::TernaryCacheError;

use super::CacheAdapter;

/// An in-memory [CacheAdapter] with a fixed capacity. Once full, every write
/// evicts an entry chosen by the SIEVE policy, which is how a memcached-like
/// store behaves under memory pressure.
///
/// Clones share the same entries.
#[derive(Clone)]
pub struct EvictingCacheAdapter {
    entries: Arc<Mutex<SieveCache<String, Vec<u8>>>>,
}

impl EvictingCacheAdapter {
    /// Create an adapter that holds at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self, TernaryCacheError> {
        Ok(Self {
            entries: Arc::new(Mutex::new(SieveCache::new(capacity).map_err(|error| {
                TernaryCacheError::CacheAdapter(format!("Could not initialize cache: {error}"))
            })?)),
        })
    }

    /// The number of entries currently held
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no entries are currently held
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl std::fmt::Debug for EvictingCacheAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvictingCacheAdapter").finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheAdapter for EvictingCacheAdapter {
    type Error = TernaryCacheError;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&mut self, key: String, value: Vec<u8>) -> Result<(), Self::Error> {
        let mut entries = self.entries.lock().await;
        entries.insert(key, value);
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }
}

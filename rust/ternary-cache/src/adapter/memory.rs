use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::TernaryCacheError;

use super::CacheAdapter;

/// A trivial implementation of [CacheAdapter] - backed by a [HashMap] - where
/// all entries are kept in memory and never evicted.
///
/// Clones share the same entries, so a clone may be kept aside to inspect or
/// tamper with what a tree has persisted.
#[derive(Clone, Default, Debug)]
pub struct MemoryCacheAdapter {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryCacheAdapter {
    /// The number of entries currently held
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no entries are currently held
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// A sorted snapshot of every key currently held
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl CacheAdapter for MemoryCacheAdapter {
    type Error = TernaryCacheError;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&mut self, key: String, value: Vec<u8>) -> Result<(), Self::Error> {
        let mut entries = self.entries.write().await;
        entries.insert(key, value);
        Ok(())
    }

    async fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

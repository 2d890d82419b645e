use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::TernaryCacheError;

mod memory;
pub use memory::*;

mod evicting;
pub use evicting::*;

mod measure;
pub use measure::*;

/// A [CacheAdapter] is a facade over some shared key-value cache (memcached,
/// redis, an in-process map) that is capable of storing, retrieving and
/// deleting byte values by string key.
///
/// Implementations are free to evict entries at any time; callers must treat
/// a missing entry as a normal outcome of [CacheAdapter::get].
#[async_trait]
pub trait CacheAdapter: Clone {
    /// The error type produced by this [CacheAdapter]
    type Error: Into<TernaryCacheError>;

    /// Retrieve the value (if any) stored against the given key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;
    /// Store the given value against the given key
    async fn set(&mut self, key: String, value: Vec<u8>) -> Result<(), Self::Error>;
    /// Remove the value stored against the given key. Removing a key that is
    /// not present is not an error.
    async fn delete(&mut self, key: &str) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T> CacheAdapter for Arc<Mutex<T>>
where
    T: CacheAdapter + Send,
{
    type Error = T::Error;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let inner = self.lock().await;
        inner.get(key).await
    }

    async fn set(&mut self, key: String, value: Vec<u8>) -> Result<(), Self::Error> {
        let mut inner = self.lock().await;
        inner.set(key, value).await
    }

    async fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        let mut inner = self.lock().await;
        inner.delete(key).await
    }
}

use async_trait::async_trait;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use super::CacheAdapter;

/// A [MeasuredCacheAdapter] acts as a proxy over a [CacheAdapter]
/// implementation that measures reads, writes and deletes.
#[derive(Clone, Debug)]
pub struct MeasuredCacheAdapter<Adapter>
where
    Adapter: CacheAdapter,
{
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
    adapter: Adapter,
}

impl<Adapter> MeasuredCacheAdapter<Adapter>
where
    Adapter: CacheAdapter,
{
    /// Wrap the provided [CacheAdapter] so that traffic to it may be measured.
    pub fn new(adapter: Adapter) -> Self {
        Self {
            reads: Arc::new(AtomicUsize::default()),
            writes: Arc::new(AtomicUsize::default()),
            deletes: Arc::new(AtomicUsize::default()),
            adapter,
        }
    }

    /// The aggregate number of reads from the wrapped [CacheAdapter]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// The aggregate number of writes to the wrapped [CacheAdapter]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// The aggregate number of deletes against the wrapped [CacheAdapter]
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::Relaxed)
    }

    /// The wrapped [CacheAdapter]
    pub fn inner(&self) -> &Adapter {
        &self.adapter
    }
}

#[async_trait]
impl<Adapter> CacheAdapter for MeasuredCacheAdapter<Adapter>
where
    Adapter: CacheAdapter + Send + Sync,
{
    type Error = Adapter::Error;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.adapter.get(key).await
    }

    async fn set(&mut self, key: String, value: Vec<u8>) -> Result<(), Self::Error> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.adapter.set(key, value).await
    }

    async fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.adapter.delete(key).await
    }
}
